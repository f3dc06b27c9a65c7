//! Plain-text rendering of the presenter screen

use itinera_presenter::{Body, EditPointView, FormMode, ListItem, PointView, Screen, SortView};
use std::fmt::Write;

pub fn render(screen: &Screen<'_>) -> String {
    let mut out = String::new();

    match screen.trip_info {
        Some(info) => {
            let _ = writeln!(
                out,
                "== {} ==  {}  Total: €{}",
                info.title,
                info.dates_label(),
                info.total_cost
            );
        }
        None => out.push_str("== Itinera ==\n"),
    }

    let filters: Vec<String> = screen
        .filters
        .iter()
        .map(|option| {
            let mark = match (option.checked, option.disabled) {
                (true, _) => "x",
                (false, true) => "-",
                (false, false) => " ",
            };
            format!("[{mark}] {} ({})", option.filter, option.count)
        })
        .collect();
    let _ = writeln!(out, "Filters: {}", filters.join("  "));

    if screen.create_button.visible {
        let state = if screen.create_button.disabled { " (disabled)" } else { "" };
        let _ = writeln!(out, "[+ New event]{state}");
    }
    if screen.blocked {
        out.push_str("... saving ...\n");
    }

    match &screen.body {
        Body::Placeholder {
            placeholder,
            creation,
        } => {
            if let Some(form) = creation {
                render_form(&mut out, "new", form);
            }
            let _ = writeln!(out, "\n  {}", placeholder.message());
        }
        Body::List {
            sort,
            creation,
            items,
        } => {
            render_sort(&mut out, sort);
            if let Some(form) = creation {
                render_form(&mut out, "new", form);
            }
            for (index, item) in items.iter().enumerate() {
                let label = (index + 1).to_string();
                match item {
                    ListItem::Display(view) => render_row(&mut out, &label, view),
                    ListItem::Editing(form) => render_form(&mut out, &label, form),
                }
            }
        }
    }
    out
}

fn render_sort(out: &mut String, sort: &SortView) {
    let options: Vec<String> = sort
        .options()
        .iter()
        .map(|option| {
            let mark = if option.checked { "•" } else { " " };
            let suffix = if option.disabled { "~" } else { "" };
            format!("({mark}) {}{suffix}", option.sort)
        })
        .collect();
    let _ = writeln!(out, "Sort: {}", options.join("  "));
}

fn render_row(out: &mut String, label: &str, view: &PointView) {
    let point = view.point();
    let favorite = if point.is_favorite { " ★" } else { "" };
    let shake = if view.shakes() > 0 { " (!)" } else { "" };
    let _ = writeln!(
        out,
        "{label}. {}  {}  {} - {}  {}  €{}{favorite}{shake}",
        point.date_from.format("%b %d").to_string().to_uppercase(),
        view.title(),
        point.date_from.format("%H:%M"),
        point.date_to.format("%H:%M"),
        view.duration_label(),
        point.base_price,
    );
    for offer in view.offers() {
        let _ = writeln!(out, "     + {} +€{}", offer.title, offer.price);
    }
}

fn render_form(out: &mut String, label: &str, form: &EditPointView) {
    let draft = form.draft();
    let heading = match form.mode() {
        FormMode::Edit => "edit",
        FormMode::Create => "create",
    };
    let destination = form.destination().map(|d| d.name.as_str()).unwrap_or("?");
    let _ = writeln!(out, "{label}. [{heading}] {} {}", draft.point_type, destination);
    let _ = writeln!(
        out,
        "     {} - {}{}",
        draft.date_from.format("%d/%m/%y %H:%M"),
        draft.date_to.format("%d/%m/%y %H:%M"),
        if form.has_nested_context() { "  [picker open]" } else { "" }
    );
    let _ = writeln!(out, "     Price: €{}", draft.base_price);

    for (index, offer) in form.available_offers().iter().enumerate() {
        let mark = if draft.offers.contains(&offer.id) { "x" } else { " " };
        let _ = writeln!(out, "     {}) [{mark}] {} +€{}", index + 1, offer.title, offer.price);
    }

    let state = form.state();
    if state.is_saving {
        out.push_str("     Saving...\n");
    } else if state.is_deleting {
        out.push_str("     Deleting...\n");
    }
    if let Some(error) = form.error() {
        let _ = writeln!(out, "     ! {error}");
    }
    if form.shakes() > 0 {
        out.push_str("     (!) last save failed\n");
    }
}
