pub(crate) mod controller;

use crate::api::NotesApi;
use crate::models::Note;
use crate::storage::{load_item, THEME_KEY};
use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Main-panel mode.
///
/// `Creating` is edit mode with an empty edited-note reference; `Editing`
/// carries the note being edited. Independent of the sidebar selection:
/// entering `Creating` does not require (or change) a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorMode {
    Viewing,
    Creating,
    Editing(Note),
}

impl EditorMode {
    pub fn is_editing(&self) -> bool {
        !matches!(self, EditorMode::Viewing)
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api: RwSignal<NotesApi>,

    /// Local cache of the store's notes, replaced wholesale on refresh and
    /// patched incrementally on create/update/delete.
    pub notes: RwSignal<Vec<Note>>,

    /// Id of the note shown in the detail view, if any. If set, it references
    /// a note present in `notes`; reconciled whenever the collection changes.
    pub selected_id: RwSignal<Option<String>>,

    pub mode: RwSignal<EditorMode>,

    /// Refresh in flight.
    pub loading: RwSignal<bool>,
    /// Persistent banner; cleared by the next successful refresh.
    pub error: RwSignal<Option<String>>,

    /// Save failure, rendered inside the form so in-progress input survives.
    pub form_error: RwSignal<Option<String>>,
    /// One-shot user-visible alert (delete failures).
    pub notice: RwSignal<Option<String>>,
    /// Submit affordance disable while a save is in flight.
    pub saving: RwSignal<bool>,

    /// Staged target of the two-phase delete; the confirmation prompt is
    /// open iff this is `Some`.
    pub delete_target: RwSignal<Option<Note>>,

    pub theme: RwSignal<Theme>,
}

impl AppState {
    pub fn new() -> Self {
        let theme = load_item(THEME_KEY)
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(Theme::Light);
        Self::with_api(NotesApi::from_env(), theme)
    }

    pub fn with_api(api: NotesApi, theme: Theme) -> Self {
        Self {
            api: RwSignal::new(api),
            notes: RwSignal::new(vec![]),
            selected_id: RwSignal::new(None),
            mode: RwSignal::new(EditorMode::Viewing),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            form_error: RwSignal::new(None),
            notice: RwSignal::new(None),
            saving: RwSignal::new(false),
            delete_target: RwSignal::new(None),
            theme: RwSignal::new(theme),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
