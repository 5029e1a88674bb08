//! Cyclone V style device model for placement and packing.
//!
//! The crate builds an [`Arch`] from a chip database: every logic bel, I/O
//! bel and clock buffer, the routing graph with its device-model wires, and
//! the LAB structures the placer checks legality against. On top of that it
//! answers the questions a placer asks while packing logic into LABs:
//!
//! - can this set of cells share one LAB's control signals ([`ctrlset`]),
//! - can these LUTs and flip-flops share one ALM's inputs ([`lut`]),
//! - and, once placement is final, which pins carry which nets and what
//!   LUT mask results.
//!
//! # Usage
//!
//! ```
//! use cinder_arch::{Arch, ArchArgs};
//!
//! let arch = Arch::new(ArchArgs::for_grid(4, 3)).unwrap();
//! assert_eq!(arch.labs().len(), 5);
//! let bel = arch.get_bel_by_name(&arch.parse_name("1.1.ALM0_COMB0")).unwrap();
//! assert_eq!(arch.name_of(arch.get_bel_type(bel).unwrap()), "MISTRAL_COMB");
//! ```
//!
//! Named parts (`5CSEMA5F31C6` and friends) use the same synthetic floorplan
//! at the part's grid size.

#![warn(missing_docs)]

pub mod arch;
pub mod bel;
pub mod chipdb;
pub mod constids;
pub mod ctrlset;
pub mod error;
pub mod globals;
pub mod ids;
pub mod io;
pub mod lab;
pub mod lut;
pub mod netlist;
pub mod pins;
pub mod pip;
pub mod wire;

pub use arch::{Arch, ArchArgs, Delay};
pub use bel::{BelInfo, BelKind, PinInfo};
pub use chipdb::{BlockType, ChipDb, ChipPort, PadInfo, SyntheticChip};
pub use ctrlset::{CtrlKind, CtrlSlots};
pub use error::ArchError;
pub use ids::{BelId, BelPin, CellId, Loc, NetId, PipId, PortDir, Pos, RNode, WireId};
pub use lab::{AlmInfo, LabInfo, ALMS_PER_LAB};
pub use lut::{AlmInputPlan, FfDataSource};
pub use netlist::{CellInfo, ControlSig, FfControlSet, NetInfo, Netlist, PortRef, Property};
pub use pins::{cell_pin_style, CellPinStyle};
pub use wire::WireInfo;
