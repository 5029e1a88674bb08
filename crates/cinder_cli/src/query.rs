//! `cinder bel`, `cinder wire` and `cinder pin`: name lookups.

use cinder_arch::{Arch, BelId, PortDir, WireId};

use crate::{device, GlobalArgs, QueryArgs};

fn wire_label(arch: &Arch, wire: WireId) -> String {
    arch.get_wire_name(wire)
        .map(|name| arch.name_of_list(&name))
        .unwrap_or_else(|_| wire.to_string())
}

fn dir_label(dir: PortDir) -> &'static str {
    match dir {
        PortDir::In => "in",
        PortDir::Out => "out",
        PortDir::InOut => "inout",
    }
}

/// Describes a bel: type, location, block index and each pin's wire.
pub fn describe_bel(arch: &Arch, bel: BelId) -> Result<String, cinder_arch::ArchError> {
    let info = arch.bel_info(bel)?;
    let loc = arch.get_bel_location(bel);
    let mut out = format!(
        "bel   {}\ntype  {}\nloc   {}.{}.{}\n",
        arch.name_of_list(&arch.get_bel_name(bel)?),
        arch.name_of(info.bel_type),
        loc.x,
        loc.y,
        loc.z
    );
    if info.block_index >= 0 {
        out.push_str(&format!("block {}\n", info.block_index));
    }
    for (&pin, pin_info) in &info.pins {
        out.push_str(&format!(
            "  {:<8}{:<6}{}\n",
            arch.name_of(pin),
            dir_label(pin_info.dir),
            wire_label(arch, pin_info.wire)
        ));
    }
    Ok(out)
}

/// Describes a wire: its drivers, its loads and the bel pins on it.
pub fn describe_wire(arch: &Arch, wire: WireId) -> Result<String, cinder_arch::ArchError> {
    let info = arch.wire_info(wire)?;
    let mut out = format!("wire  {}\n", wire_label(arch, wire));
    if let Some(src) = info.reserved_uphill() {
        out.push_str(&format!("reserved from {}\n", wire_label(arch, src)));
    }
    out.push_str(&format!("uphill ({})\n", info.wires_uphill.len()));
    for &src in &info.wires_uphill {
        out.push_str(&format!("  {}\n", wire_label(arch, src)));
    }
    out.push_str(&format!("downhill ({})\n", info.wires_downhill.len()));
    for &dst in &info.wires_downhill {
        out.push_str(&format!("  {}\n", wire_label(arch, dst)));
    }
    for bp in &info.bel_pins {
        out.push_str(&format!(
            "pin   {}.{}\n",
            arch.name_of_list(&arch.get_bel_name(bp.bel)?),
            arch.name_of(bp.pin)
        ));
    }
    Ok(out)
}

/// Runs `cinder bel`.
pub fn bel(args: &QueryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let arch = device::load(&args.device, global)?;
    let Some(bel) = arch.get_bel_by_name(&arch.parse_name(&args.name)) else {
        eprintln!("error: no bel named '{}' on {}", args.name, arch.chip_name());
        return Ok(1);
    };
    print!("{}", describe_bel(&arch, bel)?);
    Ok(0)
}

/// Runs `cinder wire`.
pub fn wire(args: &QueryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let arch = device::load(&args.device, global)?;
    let Some(wire) = arch.get_wire_by_name(&arch.parse_name(&args.name)) else {
        eprintln!("error: no wire named '{}' on {}", args.name, arch.chip_name());
        return Ok(1);
    };
    print!("{}", describe_wire(&arch, wire)?);
    Ok(0)
}

/// Runs `cinder pin`.
pub fn pin(args: &QueryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let arch = device::load(&args.device, global)?;
    let Some(bel) = arch.io_pin_bel(&args.name) else {
        eprintln!("error: no package pin '{}' on {}", args.name, arch.chip_name());
        return Ok(1);
    };
    print!("{}", describe_bel(&arch, bel)?);
    Ok(0)
}
