// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `tournaments` — Tournament lookups
//! - `teams` — Registered teams and head counts
//! - `games` — The game catalog
//! - `matches` — Bracket matches with optional filtering

pub mod games;
pub mod matches;
pub mod teams;
pub mod tournaments;
