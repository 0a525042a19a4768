//! Property tests for the derivations the inspection view relies on.

mod catalog;
mod correlation;
