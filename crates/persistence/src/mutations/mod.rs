// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Inserts return the new row id read back through
//! [`PersistenceBackend::get_last_insert_rowid`](crate::backend::PersistenceBackend).
//! Updates return the number of rows touched so callers can report missing
//! records.

pub mod games;
pub mod matches;
pub mod teams;
pub mod tournaments;
