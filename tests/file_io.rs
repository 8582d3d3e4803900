//! Integration tests against SEG-Y files on disk

use byteorder::{BigEndian, WriteBytesExt};
use segycube::utils::ieee_to_ibm;
use segycube::{
    binfield, tracefield, Dimension, SampleFormat, SegyConfig, SegyError, SegyFile, Sorting,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLES: usize = 5;

/// Write a small file, crossline sorted: inline varies fastest
///
/// Sample `k` of trace `t` holds `t * 10 + k`.
fn write_segy(path: &Path, format: i16, ilines: &[i32], xlines: &[i32]) -> std::io::Result<()> {
    let mut out = Vec::new();
    out.extend_from_slice(&[b' '; 3200]);

    let mut binary = vec![0u8; 400];
    (&mut binary[16..18]).write_i16::<BigEndian>(2000)?;
    (&mut binary[20..22]).write_i16::<BigEndian>(SAMPLES as i16)?;
    (&mut binary[24..26]).write_i16::<BigEndian>(format)?;
    out.extend_from_slice(&binary);

    let mut trace = 0;
    for &xl in xlines {
        for &il in ilines {
            let mut header = vec![0u8; 240];
            (&mut header[0..4]).write_i32::<BigEndian>(trace + 1)?;
            (&mut header[108..110]).write_i16::<BigEndian>(100)?;
            (&mut header[114..116]).write_i16::<BigEndian>(SAMPLES as i16)?;
            (&mut header[188..192]).write_i32::<BigEndian>(il)?;
            (&mut header[192..196]).write_i32::<BigEndian>(xl)?;
            out.extend_from_slice(&header);

            for k in 0..SAMPLES {
                let value = (trace * 10) as f32 + k as f32;
                match format {
                    1 => out.write_u32::<BigEndian>(ieee_to_ibm(value))?,
                    3 => out.write_i16::<BigEndian>(value as i16)?,
                    5 => out.write_f32::<BigEndian>(value)?,
                    _ => out.write_i32::<BigEndian>(value as i32)?,
                }
            }
            trace += 1;
        }
    }

    fs::File::create(path)?.write_all(&out)
}

fn create_test_file(dir: &TempDir, format: i16) -> PathBuf {
    let path = dir.path().join(format!("cube-{}.sgy", format));
    write_segy(&path, format, &[1, 2], &[20, 21, 22]).unwrap();
    path
}

#[test]
fn test_open_infers_geometry() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, 1);
    let file = SegyFile::open(&path, SegyConfig::default()).unwrap();

    assert_eq!(file.metrics().format, SampleFormat::IbmFloat32);
    assert_eq!(file.tracecount(), 6);
    assert_eq!(file.sorting(), Sorting::Crossline);
    assert_eq!(file.fast().unwrap().dimension(), Dimension::Crossline);

    let iline = file.iline().unwrap().get(2).unwrap();
    assert_eq!(iline.dim(), (3, SAMPLES));
    assert_eq!(iline.column(0).to_vec(), vec![10.0, 30.0, 50.0]);

    let xline = file.xline().unwrap().get(21).unwrap();
    assert_eq!(xline.row(1).to_vec(), vec![30.0, 31.0, 32.0, 33.0, 34.0]);

    let axis = file.samples().unwrap();
    assert_eq!(axis.step, 2.0);
    assert_eq!(axis.coord_min, 100.0);
}

#[test]
fn test_integer_formats() {
    let dir = TempDir::new().unwrap();
    for format in [2, 3, 5] {
        let path = create_test_file(&dir, format);
        let file = SegyFile::open(&path, SegyConfig::default()).unwrap();
        let trace = file.trace().get(4).unwrap();
        assert_eq!(trace.to_vec(), vec![40.0, 41.0, 42.0, 43.0, 44.0]);

        let slice = file.depth_slice().get(2).unwrap();
        assert_eq!(slice.shape(), &[3, 2]);
        assert_eq!(slice[[2, 1]], 52.0);
    }
}

#[test]
fn test_read_only_rejects_writes() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, 5);
    let file = SegyFile::open(&path, SegyConfig::default()).unwrap();
    assert!(!file.is_writable());

    assert!(matches!(
        file.trace().put(0, &[0.0; SAMPLES]),
        Err(SegyError::ReadOnly)
    ));
    let mut header = file.header().get(0).unwrap();
    assert!(matches!(
        header.set(tracefield::CDP_X, 1),
        Err(SegyError::ReadOnly)
    ));
    assert_eq!(header.get(tracefield::CDP_X).unwrap(), 0);
}

#[test]
fn test_writes_persist() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, 1);
    {
        let file = SegyFile::open(&path, SegyConfig::default().with_writable(true)).unwrap();
        file.trace().put(3, &[-1.5, 2.25, 0.0, 8.0, -16.0]).unwrap();
        file.header()
            .put(5, [(tracefield::CDP_X, 123_456), (tracefield::CDP_Y, -7)])
            .unwrap();

        let traces = file.trace();
        let mut refs = traces.refs();
        refs.get_mut(0).unwrap()[4] = 99.0;
        assert_eq!(refs.close().unwrap(), 1);

        file.bin().unwrap().set(binfield::INTERVAL, 4000).unwrap();
    }

    let file = SegyFile::open(&path, SegyConfig::default()).unwrap();
    assert_eq!(
        file.trace().get(3).unwrap().to_vec(),
        vec![-1.5, 2.25, 0.0, 8.0, -16.0]
    );
    assert_eq!(file.trace().get(0).unwrap()[4], 99.0);
    let header = file.header().get(5).unwrap();
    assert_eq!(header.get(tracefield::CDP_X).unwrap(), 123_456);
    assert_eq!(header.get(tracefield::CDP_Y).unwrap(), -7);
    assert_eq!(file.samples().unwrap().step, 4.0);
}

#[test]
fn test_malformed_files() {
    let dir = TempDir::new().unwrap();

    let path = create_test_file(&dir, 5);
    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(&[0u8; 7]);
    fs::write(&path, &bytes).unwrap();
    assert!(matches!(
        SegyFile::open(&path, SegyConfig::default()),
        Err(SegyError::InvalidFormat(_))
    ));

    let path = dir.path().join("format-4.sgy");
    write_segy(&path, 4, &[1], &[1]).unwrap();
    assert!(matches!(
        SegyFile::open(&path, SegyConfig::default()),
        Err(SegyError::UnsupportedFormat(4))
    ));

    let path = dir.path().join("short.sgy");
    fs::write(&path, [0u8; 100]).unwrap();
    assert!(matches!(
        SegyFile::open(&path, SegyConfig::default()),
        Err(SegyError::InvalidFormat(_))
    ));

    assert!(matches!(
        SegyFile::open(dir.path().join("missing.sgy"), SegyConfig::default()),
        Err(SegyError::Io(_))
    ));
}
