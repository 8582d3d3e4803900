//! Example: walk a SEG-Y cube by lines, gathers and depth slices
//!
//! Run with: cargo run --example cube_walk [path/to/file.sgy]
//!
//! Without a path, a small prestack cube is built in memory.

use ndarray::Axis;
use segycube::{
    tracefield, GatherIndex, GatherSelection, LabelRange, MemoryIo, SegyConfig, SegyFile, Sorting,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("segycube Example: Cube Walk");
    println!("===========================\n");

    let file = match std::env::args().nth(1) {
        Some(path) => SegyFile::open(path, SegyConfig::default())?,
        None => {
            let io = MemoryIo::cube(
                &[1000, 1001, 1002, 1003],
                &[2000, 2002, 2004],
                &[100, 200],
                Sorting::Crossline,
                50,
            )?;
            SegyFile::from_io(Arc::new(io), SegyConfig::default())?
        }
    };

    println!("File: {}", file.summary());
    let axis = file.samples()?;
    println!(
        "  Samples: {} ({:.1} - {:.1} {})",
        axis.num_samples,
        axis.coord_min,
        axis.coord_max(),
        axis.unit
    );
    println!();

    let Some(geometry) = file.geometry() else {
        println!("Unstructured file; only trace and depth access is available");
        let slice = file.depth_slice().get(0)?;
        println!("  Depth 0: {} values", slice.len());
        return Ok(());
    };

    println!("Geometry:");
    println!("  Inlines:    {:?}", geometry.ilines());
    println!("  Crosslines: {:?}", geometry.xlines());
    println!("  Offsets:    {:?}", geometry.offsets());
    println!("  Fast lines: {}", geometry.fast());
    println!();

    // Every inline at every offset, reusing two buffers
    println!("Inline RMS amplitudes:");
    let iline = file.iline()?;
    let mut lines = iline.range(.., ..)?;
    while let Some(line) = lines.step() {
        let line = line?;
        let rms = (line.mapv(|v| v * v).mean().unwrap_or(0.0)).sqrt();
        let (label, offset) = lines.current_key().copied().unwrap_or_default();
        println!("  il {:>5} offset {:>4}: {:>10.2}", label, offset, rms);
    }
    println!();

    // Gathers along the middle crossline, all offsets
    let xl = geometry.xlines()[geometry.xlines().len() / 2];
    println!("Gathers along crossline {}:", xl);
    let index = GatherIndex::new(LabelRange::full(), xl).with_offset(LabelRange::full());
    if let GatherSelection::Gathers(mut gathers) = file.gather()?.select(index)? {
        while let Some(gather) = gathers.step() {
            let peak = gather?
                .map_axis(Axis(1), |trace| trace.fold(f32::MIN, |a, &b| a.max(b)))
                .to_vec();
            println!("  {:?}: peaks {:?}", gathers.current_key(), peak);
        }
    }
    println!();

    let slice = file.depth_slice().get(axis.num_samples / 2)?;
    println!("Depth slice {}: shape {:?}", axis.num_samples / 2, slice.shape());

    let header = file.header().get(0)?;
    println!(
        "First trace: il {} xl {} offset {}",
        header.get(tracefield::INLINE_3D)?,
        header.get(tracefield::CROSSLINE_3D)?,
        header.get(tracefield::OFFSET)?
    );

    if file.is_writable() {
        let edited = file.trace().for_each_mut(LabelRange::new(0, 4), |_, trace| {
            trace.mapv_inplace(|v| v * 0.5);
            Ok(())
        })?;
        println!("Scaled {} traces in place", edited);
    }

    Ok(())
}
