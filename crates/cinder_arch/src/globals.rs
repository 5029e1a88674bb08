//! Clock buffers driving the global clock networks.

use crate::arch::Arch;
use crate::chipdb::{BlockType, ChipPort};
use crate::constids as id;
use crate::error::ArchError;
use crate::ids::PortDir;

/// Global clock networks, one clock buffer each.
pub const GLOBAL_CLOCKS: u32 = 4;

impl Arch {
    /// Four `MISTRAL_CLKENA` bels. Each output is a device-model wire with a
    /// single pip into its global clock network.
    pub(crate) fn create_clkbuf(&mut self, x: u32, y: u32) -> Result<(), ArchError> {
        for z in 0..GLOBAL_CLOCKS {
            let bi = z as i32;
            let name = self.id(&format!("CLKBUF{z}"));
            let bel = self.add_bel(x, y, name, id::MISTRAL_CLKENA);
            self.bel_data_mut(bel).block_index = bi;

            let clkin = self.require_port(BlockType::CmuxHg, x, y, -1, ChipPort::ClkIn, bi)?;
            self.add_bel_pin(bel, id::A, PortDir::In, clkin);
            let out_name = self.id(&format!("CLKBUF[{z}]"));
            let out = self.add_wire(x, y, out_name, 0);
            self.add_bel_pin(bel, id::Q, PortDir::Out, out);
            let gclk = self.require_port(BlockType::CmuxHg, x, y, bi, ChipPort::ClkOut, -1)?;
            self.add_pip(out, gclk);
        }
        Ok(())
    }
}
