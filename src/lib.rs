//! # pvctool
//!
//! A command-line tool for migrating Kubernetes PersistentVolumeClaim
//! storage classes in multi-document YAML manifest files.
//!
//! `pvctool` scans a configured set of manifest files for PVCs that request
//! a given access mode (by default `ReadWriteMany`) with a given storage
//! class (by default `local-path`), rewrites the storage class (by default
//! to `nfs`), and atomically rewrites each file that changed.
//!
//! ## Modules
//!
//! - [`config`] - Target file list and patch rule configuration
//! - [`manifest`] - Multi-document YAML loading and atomic rewriting
//! - [`patch`] - The matching predicate and in-place document patching

/// Target file list and patch rule configuration.
pub mod config;

/// Multi-document YAML manifest loading, rendering and atomic rewriting.
pub mod manifest;

/// PVC matching predicate and in-place document patching.
pub mod patch;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
