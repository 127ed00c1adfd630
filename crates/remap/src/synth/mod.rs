// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan synthesizer.
//!
//! Given a source expression and a type pair the synthesizer walks, in
//! order:
//!
//! 1. identity pairs, nullable lifting and runtime-typed (`Object`) sources;
//! 2. a null check of any source that can be null;
//! 3. profiles (reference-type destinations only);
//! 4. the depth rule (shallow mode aliases assignable sources);
//! 5. strategies in registry order;
//! 6. abstract collection normalization, then the `Object` destination.
//!
//! Anything left over is an abstract destination (`NoRoute`) or has no
//! route at all (`TypeMismatch`).

mod context;
pub mod members;
pub mod normalize;

pub use context::SynthContext;
