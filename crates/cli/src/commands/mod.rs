// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod inspect;
pub mod insert;
pub mod register;
pub mod search;
pub mod status;
pub mod sync;
pub mod timeline;
