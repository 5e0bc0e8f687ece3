//! Integration tests for the tabbed editor
//!
//! These tests drive complete editing workflows with simulated key events.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use editor_core::{EngineConfig, Route, TextBuffer};
use input_types::{InputEvent, KeyCode, KeyEvent, Modifiers};
use services_editor::{
    keywords, log, DocumentStore, EditorSettings, EditorView, FsDocumentStore, IoError, IoResult,
    MemoryDocumentStore, PlainTextRenderer, RenderDelegate, ScriptRunner, TabError, TabManager,
};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::pressed(code, Modifiers::NONE)
}

fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::pressed(code, Modifiers::CTRL)
}

fn type_str<S: DocumentStore>(manager: &mut TabManager<S>, text: &str) {
    for ch in text.chars() {
        manager.handle_key_event(&KeyEvent::char(ch));
    }
}

fn current_text<S: DocumentStore>(manager: &TabManager<S>) -> String {
    manager.current().map(|tab| tab.view().text()).unwrap_or_default()
}

#[derive(Default)]
struct RecordingRunner {
    runs: Vec<PathBuf>,
    fail: bool,
}

impl ScriptRunner for RecordingRunner {
    fn run(&mut self, path: &Path) -> IoResult<()> {
        if self.fail {
            return Err(IoError::Runner("python not found".to_string()));
        }
        self.runs.push(path.to_path_buf());
        Ok(())
    }
}

#[test]
fn test_write_function_with_completion() {
    log::test();
    let mut manager = TabManager::new(MemoryDocumentStore::new(), EditorSettings::default());
    manager.new_tab();

    // def f(x):
    type_str(&mut manager, "def f(x");
    manager.handle_key_event(&KeyEvent::char(')'));
    type_str(&mut manager, ":");
    manager.handle_key_event(&press(KeyCode::Enter));

    // ret<Enter> accepts "return"
    type_str(&mut manager, "ret");
    let popup = manager.current().map(|tab| tab.view().completion().is_open());
    assert_eq!(popup, Some(true));
    manager.handle_key_event(&press(KeyCode::Enter));

    type_str(&mut manager, " x");
    assert_eq!(current_text(&manager), "def f(x):\n    return x");
}

#[test]
fn test_modified_marker_follows_content() {
    let store = MemoryDocumentStore::new().with_file("main.py", "x = 1");
    let mut manager = TabManager::new(store, EditorSettings::default());
    let id = manager.open("main.py").unwrap();
    assert_eq!(manager.tab_title(id).unwrap(), "main.py");

    manager.handle_key_event(&press(KeyCode::End));
    type_str(&mut manager, "0");
    assert_eq!(manager.tab_title(id).unwrap(), "main.py *");
    assert_eq!(manager.modified_tabs(), vec![id]);

    // undo back to the saved text clears the marker
    manager.handle_key_event(&ctrl(KeyCode::Char('z')));
    assert_eq!(current_text(&manager), "x = 1");
    assert_eq!(manager.tab_title(id).unwrap(), "main.py");
    assert!(manager.modified_tabs().is_empty());
}

#[test]
fn test_save_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.py");
    std::fs::write(&path, "def hello():\n    pass\n").unwrap();

    let mut manager = TabManager::new(FsDocumentStore, EditorSettings::default());
    manager.open(&path).unwrap();
    manager.handle_key_event(&press(KeyCode::Down));
    manager.handle_key_event(&press(KeyCode::End));
    manager.handle_key_event(&press(KeyCode::Enter));
    type_str(&mut manager, "return 1");

    assert!(manager.save_current().unwrap());
    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved, "def hello():\n    pass\n    return 1\n");
    assert!(!manager.save_current().unwrap());
}

#[test]
fn test_run_saves_first() {
    let store = MemoryDocumentStore::new().with_file("job.py", "");
    let mut manager = TabManager::new(store, EditorSettings::default());
    manager.open("job.py").unwrap();
    type_str(&mut manager, "print");
    manager.handle_key_event(&press(KeyCode::Escape));
    manager.handle_key_event(&KeyEvent::char('('));
    type_str(&mut manager, "1");

    let mut runner = RecordingRunner::default();
    manager.run_current(&mut runner).unwrap();
    assert_eq!(runner.runs, vec![PathBuf::from("job.py")]);
    assert_eq!(manager.store().get("job.py"), Some("print(1)"));
    assert!(manager.modified_tabs().is_empty());
}

#[test]
fn test_run_untitled_needs_path() {
    let mut manager = TabManager::new(MemoryDocumentStore::new(), EditorSettings::default());
    manager.new_tab();
    let mut runner = RecordingRunner::default();
    assert!(matches!(manager.run_current(&mut runner), Err(TabError::NeedsPath)));
    assert!(runner.runs.is_empty());
}

#[test]
fn test_runner_failure_surfaces() {
    let store = MemoryDocumentStore::new().with_file("job.py", "pass");
    let mut manager = TabManager::new(store, EditorSettings::default());
    manager.open("job.py").unwrap();
    let mut runner = RecordingRunner {
        fail: true,
        ..RecordingRunner::default()
    };
    let err = manager.run_current(&mut runner).unwrap_err();
    assert!(matches!(err, TabError::Io(IoError::Runner(_))));
}

#[test]
fn test_ctrl_tab_cycles_tabs() {
    let store = MemoryDocumentStore::new()
        .with_file("a.py", "a")
        .with_file("b.py", "b");
    let mut manager = TabManager::new(store, EditorSettings::default());
    let a = manager.open("a.py").unwrap();
    let b = manager.open("b.py").unwrap();

    assert!(manager.handle_key_event(&ctrl(KeyCode::Tab)));
    assert_eq!(manager.current_id(), Some(a));
    assert!(manager.handle_key_event(&KeyEvent::pressed(
        KeyCode::Tab,
        Modifiers::CTRL.with(Modifiers::SHIFT)
    )));
    assert_eq!(manager.current_id(), Some(b));
    assert_eq!(current_text(&manager), "b");
}

#[test]
fn test_keystrokes_only_reach_current_tab() {
    let mut manager = TabManager::new(MemoryDocumentStore::new(), EditorSettings::default());
    let first = manager.new_tab();
    type_str(&mut manager, "one");
    let second = manager.new_tab();
    type_str(&mut manager, "two");

    let text = |id| manager.tab(id).map(|tab| tab.view().text());
    assert_eq!(text(first).as_deref(), Some("one"));
    assert_eq!(text(second).as_deref(), Some("two"));
    assert_eq!(manager.tab_titles(), vec!["untitled.py *", "untitled.py *"]);
}

#[test]
fn test_settings_flow_into_tabs() {
    let mut settings = EditorSettings::default();
    settings.engine.auto_pair = false;
    settings.app_title = "Scratch".to_string();
    settings.untitled_name = "scratch.py".to_string();

    let mut manager = TabManager::new(MemoryDocumentStore::new(), settings);
    manager.new_tab();
    type_str(&mut manager, "(");
    assert_eq!(current_text(&manager), "(");
    assert_eq!(manager.window_title(), "Scratch - scratch.py");
}

#[test]
fn test_render_frame() {
    let mut settings = EditorSettings::default();
    settings.viewport_lines = 3;
    let mut manager = TabManager::new(MemoryDocumentStore::new(), settings);
    manager.new_tab();
    type_str(&mut manager, "if x:");
    manager.handle_key_event(&press(KeyCode::Enter));
    type_str(&mut manager, "pas");

    let frame = manager
        .current()
        .map(|tab| PlainTextRenderer::default().render(tab.view()))
        .unwrap();
    assert_eq!(frame, "1 if x:\n2     pas|\n  [pass]\n~\n");
}

#[test]
fn test_router_listeners_reachable_from_view() {
    let states: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));
    let seen = states.clone();

    let mut view = EditorView::new(keywords::shared(), EngineConfig::default());
    view.router_mut()
        .on_completion_state_changed(move |state| seen.borrow_mut().push(state.is_open()));

    view.process_input(&InputEvent::key(KeyEvent::char('w')));
    view.process_input(&InputEvent::key(KeyEvent::char(' ')));
    assert_eq!(*states.borrow(), vec![true, false]);
    assert_eq!(view.router().last_route(), Some(Route::Default));
    assert_eq!(view.buffer().len_chars(), 2);
}
