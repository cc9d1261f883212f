//! Data model for the sizelens size-attribution engine.
//!
//! This crate provides:
//!
//! - **Interned names** ([`Name`], [`StringPool`], [`SharedPool`]) — one
//!   content-deduplicated, reference-counted string table per run holds
//!   every file path and function name; keys compare as plain integers.
//!
//! - **Address ranges** ([`AddrRange`]) — half-open `[start, end)` ranges
//!   over the binary's address space, with saturating lengths so malformed
//!   debug info measures zero instead of erroring.
//!
//! - **Debug-info nodes** ([`CodeNode`], [`Tag`], [`NodeId`], [`FileId`],
//!   [`SourcePos`]) — the transient per-walk view of one scope of
//!   compiled code, as supplied by the provider.
//!
//! - **What/Where identities** ([`WhatInfo`], [`WhereInfo`]) — the
//!   canonical definition of a piece of code vs. the concrete site that
//!   uses it, which differ for inlined code.
//!
//! - **Seams** ([`DebugInfoProvider`], [`AttrConfig`]) — the extraction
//!   layer interface and the engine's recognized configuration.
//!
//! The attribution passes themselves live in `sizelens_attr`.

mod addr;
mod config;
mod interner;
mod name;
mod node;
mod provider;
mod usage;

pub use addr::AddrRange;
pub use config::AttrConfig;
pub use interner::{InternError, SharedPool, StringPool};
pub use name::Name;
pub use node::{CodeNode, FileId, NodeId, SourcePos, Tag};
pub use provider::DebugInfoProvider;
pub use usage::{WhatInfo, WhereInfo};
