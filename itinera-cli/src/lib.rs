pub mod app;
pub mod command;
pub mod render;

pub use app::{App, AppError, Outcome};
pub use command::{parse, Command, CommandError, FieldEdit, Target};
pub use render::render;
