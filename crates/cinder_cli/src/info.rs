//! `cinder info`: a resource summary of the selected device.

use std::collections::BTreeMap;

use cinder_arch::Arch;

use crate::{device, GlobalArgs, InfoArgs, ReportFormat};

/// Resource counts of a device model.
#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    /// Part name.
    pub part: String,
    /// Grid width and height.
    pub grid: (u32, u32),
    /// Number of LABs.
    pub labs: usize,
    /// Bel count per bel type.
    pub bels: BTreeMap<String, usize>,
    /// Number of wires.
    pub wires: usize,
    /// Number of pips.
    pub pips: usize,
}

impl Summary {
    /// Counts the resources of `arch`.
    pub fn of(arch: &Arch) -> Self {
        let mut bels = BTreeMap::new();
        for &bel in arch.bels() {
            if let Ok(bel_type) = arch.get_bel_type(bel) {
                *bels.entry(arch.name_of(bel_type).to_string()).or_insert(0) += 1;
            }
        }
        Self {
            part: arch.chip_name().to_string(),
            grid: (arch.grid_dim_x(), arch.grid_dim_y()),
            labs: arch.labs().len(),
            bels,
            wires: arch.wire_count(),
            pips: arch.pip_count(),
        }
    }

    fn to_text(&self) -> String {
        let mut out = format!(
            "device  {}\ngrid    {} x {}\nlabs    {}\nbels    {}\n",
            self.part,
            self.grid.0,
            self.grid.1,
            self.labs,
            self.bels.values().sum::<usize>()
        );
        for (bel_type, count) in &self.bels {
            out.push_str(&format!("  {bel_type:<16}{count}\n"));
        }
        out.push_str(&format!("wires   {}\npips    {}\n", self.wires, self.pips));
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "part": self.part,
            "grid": [self.grid.0, self.grid.1],
            "labs": self.labs,
            "bels": self.bels,
            "wires": self.wires,
            "pips": self.pips,
        })
    }
}

/// Runs `cinder info`.
pub fn run(args: &InfoArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let arch = device::load(&args.device, global)?;
    let summary = Summary::of(&arch);
    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", summary.to_text());
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary.to_json())?),
    }
    Ok(0)
}
