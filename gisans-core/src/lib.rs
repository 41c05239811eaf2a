//! Leaf types shared by the event-exchange pipelines: neutron events,
//! kinematic conversions, the detector angular grid and the ASCII wire codec.

pub mod event;
pub mod grid;
pub mod kinematics;
pub mod wire;

pub use event::{NeutronEvent, ScatterEvent};
pub use grid::DetectorGrid;
pub use kinematics::{beam_from_velocity, velocity_from_beam, BeamParameters, KinematicsError, V2L};
pub use wire::{format_event_line, parse_event_line, WireError};
