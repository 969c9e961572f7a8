// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Start-up services for the shell binary: where data lives and what the
// configuration says.

pub mod config;
pub mod data_dir;
