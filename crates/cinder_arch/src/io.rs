//! GPIO blocks and package-pin constraints.

use crate::arch::Arch;
use crate::chipdb::{BlockType, ChipPort, PadInfo};
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::{BelId, PortDir};
use cinder_common::Ident;
use cinder_config::AttrValue;

/// I/O bels per GPIO block.
pub const IOS_PER_GPIO: u32 = 4;

impl Arch {
    pub(crate) fn create_gpio(&mut self, x: u32, y: u32) -> Result<(), ArchError> {
        for z in 0..IOS_PER_GPIO {
            let bi = z as i32;
            let pad_name = self.id(&format!("PAD[{z}]"));
            let pad = self.add_wire(x, y, pad_name, 0);
            let name = self.id(&format!("IO{z}"));
            let bel = self.add_bel(x, y, name, id::MISTRAL_IO);
            self.bel_data_mut(bel).block_index = bi;

            self.add_bel_pin(bel, id::PAD, PortDir::InOut, pad);
            let datain = self.require_port(BlockType::Gpio, x, y, bi, ChipPort::DataIn, -1)?;
            self.add_bel_pin(bel, id::I, PortDir::In, datain);
            let oein = self.require_port(BlockType::Gpio, x, y, bi, ChipPort::OeIn, -1)?;
            self.add_bel_pin(bel, id::OE, PortDir::In, oein);
            let dataout = self.require_port(BlockType::Gpio, x, y, bi, ChipPort::DataOut, -1)?;
            self.add_bel_pin(bel, id::O, PortDir::Out, dataout);
        }
        Ok(())
    }

    /// Returns `true` for the I/O buffer cell types.
    pub fn is_io_cell(&self, cell_type: Ident) -> bool {
        matches!(cell_type, id::MISTRAL_IO | id::MISTRAL_IB | id::MISTRAL_OB)
    }

    /// The I/O bel behind a package pad.
    pub fn get_io_pin_bel(&self, pad: PadInfo) -> Option<BelId> {
        let pos = pad.pos();
        if pos.x() >= self.grid_dim_x() || pos.y() >= self.grid_dim_y() {
            return None;
        }
        self.bel_by_block_idx(pos.x(), pos.y(), id::MISTRAL_IO, pad.block_index() as i32)
    }

    /// The I/O bel behind a package pin name such as `PIN_L3`.
    pub fn io_pin_bel(&self, pin: &str) -> Option<BelId> {
        self.chip().package_pin(pin).and_then(|pad| self.get_io_pin_bel(pad))
    }

    /// The I/O bel a top-level port is constrained to by its `PIN` attribute.
    pub fn constrained_io_bel(&self, port: Ident) -> Option<BelId> {
        match self.io_attr(port)?.get(&id::PIN)? {
            AttrValue::Str(pin) => self.io_pin_bel(pin),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{ArchArgs, CODE_IO_PIN};
    use cinder_diagnostics::Severity;
    use std::collections::BTreeMap;

    fn args_with_pins(pins: &[(&str, &str)]) -> ArchArgs {
        let mut io = BTreeMap::new();
        for (port, pin) in pins {
            let mut attrs = BTreeMap::new();
            attrs.insert("PIN".to_string(), AttrValue::Str(pin.to_string()));
            attrs.insert("IO_STANDARD".to_string(), AttrValue::Str("3.3-V LVTTL".to_string()));
            io.insert(port.to_string(), attrs);
        }
        ArchArgs {
            io_attr: io,
            ..ArchArgs::for_grid(5, 3)
        }
    }

    #[test]
    fn gpio_columns_hold_io_bels() {
        let arch = Arch::new(ArchArgs::for_grid(5, 3)).unwrap();
        for y in 0..3 {
            for x in [0, 4] {
                assert_eq!(arch.tile_bel_dim_z(x, y), IOS_PER_GPIO as usize);
            }
        }
        let bel = arch.get_bel_by_name(&arch.parse_name("4.2.IO3")).unwrap();
        assert_eq!(arch.get_bel_type(bel).unwrap(), id::MISTRAL_IO);
        assert_eq!(arch.get_bel_pin_type(bel, id::PAD), Some(PortDir::InOut));
        assert_eq!(arch.bel_info(bel).unwrap().block_index, 3);
        assert!(arch.get_bel_pin_wire(bel, id::PAD).unwrap().node().is_synthetic());
    }

    #[test]
    fn io_cells_share_the_io_bucket() {
        let arch = Arch::new(ArchArgs::for_grid(5, 3)).unwrap();
        let bel = arch.get_bel_by_name(&arch.parse_name("0.1.IO0")).unwrap();
        for t in [id::MISTRAL_IB, id::MISTRAL_OB, id::MISTRAL_IO] {
            assert!(arch.is_io_cell(t));
            assert!(arch.is_valid_bel_for_cell_type(t, bel));
        }
        assert!(!arch.is_valid_bel_for_cell_type(id::MISTRAL_ALUT2, bel));
    }

    #[test]
    fn package_pin_lookup() {
        let arch = Arch::new(ArchArgs::for_grid(5, 3)).unwrap();
        let bel = arch.io_pin_bel("PIN_R9").unwrap();
        assert_eq!(arch.name_of_list(&arch.get_bel_name(bel).unwrap()), "4.2.IO1");
        assert!(arch.io_pin_bel("PIN_R12").is_none());
        assert!(arch.io_pin_bel("W15").is_none());
    }

    #[test]
    fn constrained_ports() {
        let arch = Arch::new(args_with_pins(&[("led[0]", "PIN_L2")])).unwrap();
        let port = arch.id("led[0]");
        let bel = arch.constrained_io_bel(port).unwrap();
        assert_eq!(arch.name_of_list(&arch.get_bel_name(bel).unwrap()), "0.0.IO2");
        let attrs = arch.io_attr(port).unwrap();
        assert_eq!(
            attrs.get(&arch.id("IO_STANDARD")),
            Some(&AttrValue::Str("3.3-V LVTTL".to_string()))
        );
        assert!(arch.constrained_io_bel(arch.id("other")).is_none());
        assert!(!arch
            .diagnostics
            .diagnostics()
            .iter()
            .any(|d| d.code == CODE_IO_PIN));
    }

    #[test]
    fn unknown_pin_is_a_warning() {
        let arch = Arch::new(args_with_pins(&[("key", "PIN_Q99")])).unwrap();
        let records = arch.diagnostics.diagnostics();
        let warning = records.iter().find(|d| d.code == CODE_IO_PIN).unwrap();
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.subject.as_deref(), Some("key"));
        assert!(!arch.diagnostics.has_errors());
        assert!(arch.constrained_io_bel(arch.id("key")).is_none());
    }
}
