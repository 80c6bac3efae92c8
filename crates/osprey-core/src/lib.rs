//! # OSPREY Bridge
//!
//! A thin bootstrap layer that hosts the OSPREY computational protein design
//! engine in an embedded virtual machine and exposes its class namespace to
//! Rust programs. All of the science (conformation search, energy
//! minimization, design algorithms) lives in the engine; this crate only
//! starts it, resolves its classes, and hands opaque engine values around.
//!
//! ## Architectural Philosophy
//!
//! The crate is organized around one seam and one lifecycle:
//!
//! - **[`bridge`]: The Seam.** The [`bridge::EngineBridge`] trait is the only
//!   thing that knows how the engine is actually hosted. Production uses the
//!   in-process JVM backend (`bridge::jvm`, behind the `jvm` feature); tests
//!   run against an in-memory double.
//!
//! - **[`runtime`]: The Lifecycle.** [`runtime::Osprey`] is the single
//!   context handle constructed around a bridge. Its `start` drives the
//!   fixed boot sequence (relay, classpath, launch, globals, banner) and
//!   guards every later operation behind an initialization check.
//!
//! - **[`namespace`], [`strand`], [`relay`]: The Surface.** Lazy dotted-path
//!   resolution over the engine class tree, the two convenience
//!   constructors (structure loading, strand building), and the
//!   uncaught-error relay that reprints engine-native detail.

pub mod bridge;
pub mod config;
pub mod error;
pub mod namespace;
pub mod relay;
pub mod runtime;
pub mod strand;
