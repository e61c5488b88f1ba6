#![doc = "zipdrop-core: core logic library for zipdrop."]

//! This crate holds the batch pipeline that turns every folder under a source
//! directory into a zip archive and hands it to a file host.
//! The HTTP transport and CLI glue live in the `zipdrop` crate; everything here
//! talks to the outside world through the traits in [`contract`].
//!
//! # Usage
//! Build a [`batch::BatchConfig`], pick an [`contract::Archiver`], an
//! [`contract::ArchiveUploader`] and a [`reporter::Reporter`], then call
//! [`batch::run_batch`].

pub mod archive;
pub mod batch;
pub mod contract;
pub mod error;
pub mod reference;
pub mod reporter;
pub mod size_gate;
pub mod source;
