use crate::pages::NotesPage;
use crate::state::controller::NotesController;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppState::new();
    let ctx = AppContext(app_state);
    provide_context(ctx);
    provide_context(NotesController::new(ctx));

    // Theme tokens are keyed off a root attribute, as the stylesheet expects.
    Effect::new(move |_| {
        if let Some(root) = document().document_element() {
            let _ = root.set_attribute("data-theme", app_state.theme.get().as_str());
        }
    });

    view! { <NotesPage /> }
}
