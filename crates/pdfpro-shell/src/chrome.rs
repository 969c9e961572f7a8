// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop status-bar equivalent: a hidden status bar is borderless
// fullscreen, which the user leaves the same way they leave any fullscreen
// window.

use std::rc::Rc;

use pdfpro_bridge::traits::NativeChrome;
use pdfpro_core::error::Result;
use tao::window::{Fullscreen, Window};

pub struct WindowChrome {
    window: Rc<Window>,
}

impl WindowChrome {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl NativeChrome for WindowChrome {
    fn set_status_bar_visible(&self, visible: bool) -> Result<()> {
        let fullscreen = (!visible).then_some(Fullscreen::Borderless(None));
        self.window.set_fullscreen(fullscreen);
        Ok(())
    }
}
