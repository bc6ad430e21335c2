//! Exotour — Camera bounded context.
//!
//! The [`domain::director::CameraDirector`] eases the camera toward a target
//! once per frame and hands ownership of the pose to the free-orbit
//! collaborator exactly once.

pub mod application;
pub mod domain;
