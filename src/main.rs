use file_tree_viewer::app;
use file_tree_viewer::app::file_dialog::NativeDialogService;
use file_tree_viewer::app::shell::NativeShellService;
use file_tree_viewer::web_assets;
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use tracing_subscriber::EnvFilter;
use wry::WebViewBuilder;

fn main() {
    // Initialize logging; RUST_LOG overrides the default level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create the event loop and window
    let event_loop = EventLoopBuilder::<app::events::UserEvent>::with_user_event().build();

    #[cfg(target_os = "macos")]
    file_tree_viewer::platform::macos::ensure_main_menu();

    let initial_state = app::state::AppState::default();
    let (width, height) = initial_state.config.window_size;
    let (pos_x, pos_y) = initial_state.config.window_position;
    tracing::info!("Starting with root {:?}", initial_state.root);

    let window = WindowBuilder::new()
        .with_title("File Tree Viewer")
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(600, 400))
        .build(&event_loop)
        .expect("Failed to build Window");

    // Create the shared application state and the event loop proxy
    let proxy = event_loop.create_proxy();
    let state = Arc::new(Mutex::new(initial_state));
    let dialog_service = Arc::new(NativeDialogService);
    let shell_service = Arc::new(NativeShellService::default());

    let ipc_handler_state = state.clone();
    let ipc_handler_proxy = proxy.clone();
    let ipc_handler_dialog = dialog_service.clone();
    let ipc_handler_shell = shell_service.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(
            message,
            ipc_handler_dialog.clone(),
            ipc_handler_shell.clone(),
            ipc_handler_proxy.clone(),
            ipc_handler_state.clone(),
        );
    };

    // Dropping a folder onto the window makes it the root.
    let drop_handler_state = state.clone();
    let drop_handler_proxy = proxy.clone();
    let drop_handler_dialog = dialog_service.clone();
    let file_drop_handler = move |event| {
        use wry::FileDropEvent;
        if let FileDropEvent::Dropped { paths, .. } = event {
            if let Some(path) = paths.first() {
                app::commands::set_root(
                    &*drop_handler_dialog,
                    path.clone(),
                    drop_handler_proxy.clone(),
                    drop_handler_state.clone(),
                );
            }
        }
        true
    };

    let webview = WebViewBuilder::new(&window)
        .with_custom_protocol(web_assets::PROTOCOL.into(), web_assets::respond)
        .with_url(&web_assets::start_url())
        .with_devtools(cfg!(debug_assertions))
        .with_ipc_handler(ipc_handler)
        .with_file_drop_handler(file_drop_handler)
        .build()
        .expect("Failed to build WebView");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("Close requested.");
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(user_event) => {
                if app::handle_user_event(user_event, &webview) {
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => (),
        }
    });
}
