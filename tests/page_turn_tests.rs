use std::path::Path;

use leafturn::managers::{DocumentId, JsonLibrary, ReadingPositions};
use leafturn::settings::Settings;
use leafturn::test_utils::test_helpers::{TestScenarioBuilder, create_test_terminal};
use leafturn::{App, InMemoryDocument, run_app_with_event_source};

fn numbered_app(page_count: u32, settings: Settings) -> App {
    App::with_document(
        Box::new(InMemoryDocument::numbered(page_count)),
        DocumentId::from_path(Path::new("tests/numbered.txt")),
        JsonLibrary::ephemeral(),
        settings,
    )
    .unwrap()
}

fn run(app: &mut App, scenario: TestScenarioBuilder) {
    let mut terminal = create_test_terminal(80, 24);
    let mut events = scenario.quit().build();
    run_app_with_event_source(&mut terminal, app, &mut events).unwrap();
}

fn spread() -> Settings {
    Settings {
        dual_page: true,
        ..Settings::default()
    }
}

#[test]
fn go_to_page_forward_updates_position_label_and_slider() {
    let mut app = numbered_app(10, Settings::default());
    run(&mut app, TestScenarioBuilder::new().go_to_page(5));

    let viewer = app.viewer();
    assert_eq!(viewer.current_page(), 5);
    assert_eq!(viewer.label_text(), Some("5/10"));
    assert_eq!(viewer.slider_value(), Some(5));
}

#[test]
fn go_to_earlier_page() {
    let mut app = numbered_app(10, Settings::default());
    run(&mut app, TestScenarioBuilder::new().go_to_page(5).go_to_page(3));
    assert_eq!(app.viewer().current_page(), 3);
    assert_eq!(app.viewer().label_text(), Some("3/10"));
}

#[test]
fn go_to_out_of_range_page_changes_nothing() {
    let mut app = numbered_app(10, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new().go_to_page(11).press_esc(),
    );
    assert_eq!(app.viewer().current_page(), 1);
    assert_eq!(app.viewer().label_text(), Some("1/10"));
}

#[test]
fn keyboard_navigation_moves_one_page() {
    let mut app = numbered_app(10, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new().next_page(3).prior_page(1),
    );
    assert_eq!(app.viewer().current_page(), 3);
}

#[test]
fn first_and_last_page() {
    let mut app = numbered_app(10, Settings::default());
    run(&mut app, TestScenarioBuilder::new().last_page());
    assert_eq!(app.viewer().current_page(), 10);

    run(&mut app, TestScenarioBuilder::new().first_page());
    assert_eq!(app.viewer().current_page(), 1);
}

#[test]
fn navigation_stops_at_document_ends() {
    let mut app = numbered_app(3, Settings::default());
    run(&mut app, TestScenarioBuilder::new().prior_page(2));
    assert_eq!(app.viewer().current_page(), 1);

    run(&mut app, TestScenarioBuilder::new().next_page(5));
    assert_eq!(app.viewer().current_page(), 3);
    assert_eq!(app.viewer().label_text(), Some("3/3"));
}

#[test]
fn mouse_wheel_turns_pages() {
    let mut app = numbered_app(10, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new().scroll_down().scroll_down().scroll_up(),
    );
    // Wheel turns are ignored while one is running, so only the first lands
    assert_eq!(app.viewer().current_page(), 2);
    assert_eq!(app.viewer().label_text(), Some("2/10"));
}

#[test]
fn spread_mode_moves_by_two_pages() {
    let mut app = numbered_app(10, spread());
    run(&mut app, TestScenarioBuilder::new().next_page(2));
    assert_eq!(app.viewer().current_page(), 5);
    assert_eq!(app.viewer().displayed_pages(), vec![Some(5), Some(6)]);
    assert!(app.viewer().live_view_count() <= 3);
}

#[test]
fn spread_mode_last_page_faces_empty_page() {
    let mut app = numbered_app(10, spread());
    run(&mut app, TestScenarioBuilder::new().last_page());
    assert_eq!(app.viewer().displayed_pages(), vec![Some(10), None]);
    assert_eq!(app.viewer().label_text(), Some("10/10"));
}

#[test]
fn toolbar_next_button_click() {
    let mut app = numbered_app(10, Settings::default());
    // " > " is the fourth button on the toolbar's inner row
    run(&mut app, TestScenarioBuilder::new().click(16, 1));
    assert_eq!(app.viewer().current_page(), 2);
}

#[test]
fn slider_drag_opens_page_on_release() {
    let mut app = numbered_app(10, Settings::default());
    run(&mut app, TestScenarioBuilder::new().drag((1, 22), (66, 22)));
    assert_eq!(app.viewer().current_page(), 10);
    assert_eq!(app.viewer().slider_value(), Some(10));
}

#[test]
fn slider_keys_preview_then_commit() {
    let mut app = numbered_app(10, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new()
            .press_char('.')
            .press_char('.')
            .press_enter(),
    );
    assert_eq!(app.viewer().current_page(), 3);
}

#[test]
fn slider_escape_restores_label() {
    let mut app = numbered_app(10, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new().press_char('.').press_esc(),
    );
    assert_eq!(app.viewer().current_page(), 1);
    assert_eq!(app.viewer().label_text(), Some("1/10"));
}

#[test]
fn thumbnails_popup_opens_selected_page() {
    let mut app = numbered_app(20, Settings::default());
    run(
        &mut app,
        TestScenarioBuilder::new()
            .press_char('t')
            .press_char('l')
            .press_char('l')
            .press_enter(),
    );
    assert_eq!(app.viewer().current_page(), 3);
    assert!(!app.has_active_popup());
}

#[test]
fn quitting_mid_turn_remembers_requested_page() {
    let mut app = numbered_app(10, Settings::default());
    run(&mut app, TestScenarioBuilder::new().go_to_page(7));
    assert_eq!(app.library().last_page(app.doc_id()), Some(7));
}

#[test]
fn hidden_bars_still_navigate() {
    let settings = Settings {
        toolbar_visible: false,
        bottombar_visible: false,
        ..Settings::default()
    };
    let mut app = numbered_app(10, settings);
    run(&mut app, TestScenarioBuilder::new().next_page(1));
    assert_eq!(app.viewer().current_page(), 2);
    assert_eq!(app.viewer().label_text(), None);
}
