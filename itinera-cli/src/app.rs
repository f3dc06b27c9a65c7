use itinera_core::{PointsModel, ProgrammingError};
use itinera_presenter::{EditAction, EditPointView, Key, TripPresenter, ViewIntent};
use std::sync::Arc;
use uuid::Uuid;

use crate::command::{Command, CommandError, FieldEdit, Target, HELP};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("No row {0} on screen")]
    NoSuchRow(usize),

    #[error("No offer {0} for this form")]
    NoSuchOffer(usize),

    #[error("Open the form first")]
    FormClosed,

    #[error(transparent)]
    Programming(#[from] ProgrammingError),

    #[error("Failed to serialize points: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What the driver should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Print(String),
    Quit,
}

/// Translates commands into presenter intents
pub struct App {
    presenter: TripPresenter,
    model: Arc<dyn PointsModel>,
}

impl App {
    pub fn new(presenter: TripPresenter, model: Arc<dyn PointsModel>) -> Self {
        Self { presenter, model }
    }

    pub fn presenter(&self) -> &TripPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut TripPresenter {
        &mut self.presenter
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome, AppError> {
        let intent = match command {
            Command::Show => return Ok(Outcome::Render),
            Command::Help => return Ok(Outcome::Print(HELP.to_string())),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Dump => {
                let json = serde_json::to_string_pretty(&self.model.points())?;
                return Ok(Outcome::Print(json));
            }
            Command::Escape => {
                self.presenter.handle_key(Key::Escape);
                return Ok(Outcome::Render);
            }
            Command::Open(row) => ViewIntent::Expand(self.row_id(row)?),
            Command::Close(Target::Row(row)) => ViewIntent::Rollup(self.row_id(row)?),
            Command::Close(Target::Creation) => ViewIntent::CreationCancel,
            Command::Save(Target::Row(row)) => ViewIntent::Submit(self.row_id(row)?),
            Command::Save(Target::Creation) => ViewIntent::CreationSubmit,
            Command::Delete(row) => ViewIntent::Delete(self.row_id(row)?),
            Command::Favorite(row) => ViewIntent::ToggleFavorite(self.row_id(row)?),
            Command::Sort(sort) => ViewIntent::SortChange(sort),
            Command::Filter(filter) => ViewIntent::FilterChange(filter),
            Command::New => ViewIntent::CreateClick,
            Command::Edit(target, edit) => self.edit_intent(target, edit)?,
        };

        self.presenter.perform(intent).await?;
        Ok(Outcome::Render)
    }

    fn row_id(&self, row: usize) -> Result<Uuid, AppError> {
        row.checked_sub(1)
            .and_then(|index| self.presenter.visible_ids().get(index))
            .copied()
            .ok_or(AppError::NoSuchRow(row))
    }

    fn form(&self, target: Target) -> Result<&EditPointView, AppError> {
        let form = match target {
            Target::Row(row) => {
                let id = self.row_id(row)?;
                self.presenter
                    .presenter(id)
                    .filter(|p| p.is_editing())
                    .and_then(|p| p.edit_view())
            }
            Target::Creation => self.presenter.new_point().form(),
        };
        form.ok_or(AppError::FormClosed)
    }

    fn edit_intent(&self, target: Target, edit: FieldEdit) -> Result<ViewIntent, AppError> {
        let form = self.form(target)?;
        let action = match edit {
            FieldEdit::Price(amount) => EditAction::ChangePrice(amount),
            FieldEdit::Destination(city) => EditAction::ChangeDestination(city),
            FieldEdit::Type(point_type) => EditAction::ChangeType(point_type),
            FieldEdit::Dates { from, to } => EditAction::ChangeDates { from, to },
            FieldEdit::Picker => EditAction::OpenDatePicker,
            FieldEdit::Offer(index) => {
                let offer = index
                    .checked_sub(1)
                    .and_then(|i| form.available_offers().get(i))
                    .ok_or(AppError::NoSuchOffer(index))?;
                EditAction::ToggleOffer(offer.id)
            }
        };

        Ok(match target {
            Target::Row(row) => ViewIntent::Edit(self.row_id(row)?, action),
            Target::Creation => ViewIntent::CreationEdit(action),
        })
    }
}
