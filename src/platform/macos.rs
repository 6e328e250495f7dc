//! macOS-specific helpers.
#![allow(deprecated)] // Keep Cocoa warnings localized

use cocoa::appkit::{NSApp, NSApplication, NSMenu};
use cocoa::base::{id, nil};

/// Installs an empty main menu if the application has none yet.
///
/// wry forwards `keyDown:` to `NSApp.mainMenu.performKeyEquivalent(_)`; with
/// no main menu that is a null dereference inside WebKit. The File/View/Edit
/// menus themselves are rendered by the webview, so an empty bar suffices.
pub fn ensure_main_menu() {
    unsafe {
        let app = NSApp();
        let current: id = app.mainMenu();
        if current == nil {
            app.setMainMenu_(NSMenu::new(nil));
        }
    }
}
