// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod amount;
pub mod controller;
pub mod filter;
pub mod forms;
pub mod ids;
pub mod model;
pub mod service;
pub mod state;
pub mod upload;

pub use amount::*;
pub use controller::*;
pub use filter::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use service::*;
pub use state::*;
pub use upload::*;
