// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDFPro — native shell for the web PDF viewer/editor
//
// Entry point. Initialises logging, configuration and the worker runtime,
// opens the window with the hosted web application, and runs the UI loop
// that feeds bridge events to the host.

mod services;

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use pdfpro_bridge::{BridgeOptions, platform_bridge};
use pdfpro_core::error::{PdfProError, Result};
use pdfpro_shell::assets::AssetServer;
use pdfpro_shell::chrome::WindowChrome;
use pdfpro_shell::webview::WrySurface;
use pdfpro_shell::{BridgeHost, HostControl, HostOptions, HostParts, UiEvent, UiHandle};
use tao::dpi::LogicalSize;
use tao::event::{ElementState, Event, KeyEvent, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::keyboard::Key;
use tao::window::WindowBuilder;
use tracing_subscriber::EnvFilter;

use services::config::load_config;
use services::data_dir::{data_dir, default_asset_dir};

/// Nudge sent through the event loop when the UI queue has work.
#[derive(Debug, Clone, Copy)]
struct Wake;

fn main() {
    let filter = EnvFilter::try_from_env("PDFPRO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("PDFPro starting");

    if let Err(e) = run() {
        tracing::error!(error = %e, "PDFPro could not start");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = load_config(&data_dir());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("pdfpro-worker")
        .build()?;

    let event_loop = EventLoopBuilder::<Wake>::with_user_event().build();
    let proxy = Mutex::new(event_loop.create_proxy());
    let (ui, mut queue) = UiHandle::new(move || {
        if let Ok(proxy) = proxy.lock() {
            // Fails only once the loop has exited.
            let _ = proxy.send_event(Wake);
        }
    });

    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(LogicalSize::new(1024.0, 768.0))
        .build(&event_loop)
        .map_err(|e| PdfProError::Surface(e.to_string()))?;
    let window = Rc::new(window);

    let asset_dir = config.asset_dir.clone().unwrap_or_else(default_asset_dir);
    let assets = Arc::new(AssetServer::new(asset_dir));
    let surface = WrySurface::build(&window, &config, assets, ui.clone())?;

    let platform = platform_bridge(BridgeOptions {
        downloads_dir: config.downloads_dir.clone(),
        runtime: runtime.handle().clone(),
    });

    let mut host = BridgeHost::new(HostParts {
        surface: Box::new(surface),
        platform,
        chrome: Box::new(WindowChrome::new(Rc::clone(&window))),
        ui,
        workers: runtime.handle().clone(),
        options: HostOptions::from(&config),
    });

    // The runtime and window must outlive the loop.
    let keep_alive = (runtime, window);

    event_loop.run(move |event, _target, control_flow| {
        let _ = &keep_alive;
        *control_flow = ControlFlow::Wait;

        let control = match event {
            Event::UserEvent(Wake) => {
                let mut control = HostControl::Continue;
                for event in queue.drain() {
                    control = host.handle(event);
                    if control == HostControl::Exit {
                        break;
                    }
                }
                control
            }
            Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key: Key::BrowserBack,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    },
                ..
            } => host.handle(UiEvent::BackPressed),
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => HostControl::Exit,
            Event::LoopDestroyed => {
                host.teardown();
                HostControl::Continue
            }
            _ => HostControl::Continue,
        };

        if control == HostControl::Exit {
            host.teardown();
            tracing::info!("PDFPro closing");
            *control_flow = ControlFlow::Exit;
        }
    })
}
