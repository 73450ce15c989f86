//! Parse raw sensor data from FLIR R-JPEGs.
//!
//! This is an incomplete port of relevant parts of the
//! excellent [ExifTool] by Phil Harvey and other authors.
//! Only supports R-JPEGs with FFF headers and 16-bit raw
//! images, and only reads enough of the record directory to
//! locate the raw digital counts.
//!
//! For a complete extraction of FLIR and other metadata,
//! please use [ExifTool] directly.
//!
//! [ExifTool]: //exiftool.org
use std::io::Read;

use anyhow::{anyhow, bail, ensure, Result};
use byteordered::{ByteOrdered, Endianness};
use img_parts::jpeg::{markers, Jpeg};
use ndarray::Array2;

const RAW_DATA_RECORD: u16 = 0x01;
const PNG_SUB_TYPE: u16 = 3;

/// Data collected from the FLIR segment(s) of an R-JPEG.
#[derive(Debug)]
pub struct FlirSegment {
    data: Vec<u8>,
    dir: Vec<FlirRecordDirEntry>,
}

impl FlirSegment {
    /// Collects all the FLIR APP1 segments from a [`Jpeg`]
    /// image and parses the FFF record directory from them.
    pub fn try_from_jpeg(image: &Jpeg) -> Result<Self> {
        let data = collect_flir_data(
            image
                .segments_by_marker(markers::APP1)
                .map(|s| &s.contents()[..]),
        )?;
        let dir = parse_record_directory(&data)?;
        Ok(FlirSegment { data, dir })
    }

    /// Try to find and parse the raw sensor values as a
    /// 2-D array of digital counts. Returns `None` if no
    /// raw data record is present (but parsing was
    /// otherwise successful).
    pub fn try_parse_raw_counts(&self) -> Result<Option<Array2<u16>>> {
        self.dir
            .iter()
            .find_map(|e| e.try_parse_raw_counts(&self.data).transpose())
            .transpose()
    }
}

/// Reassemble FLIR data from APP1 segment payloads.
///
/// # Implementation
///
/// FLIR data is stored as a collection of APP1 segments
/// with the following format:
///
/// - 0x0: signature: "FLIR\0"
/// - 0x6: segment number: zero-based idx
/// - 0x7: last segment number (= total segments - 1)
/// - 0x8..: data
fn collect_flir_data<'a>(segments: impl Iterator<Item = &'a [u8]>) -> Result<Vec<u8>> {
    let mut chunks: Vec<Vec<u8>> = vec![];
    let mut num_copied = 0;
    let mut total_len = 0;

    for contents in segments {
        if contents.len() < 8 || &contents[0..5] != b"FLIR\0" {
            continue;
        }

        let current = contents[6] as usize;
        let total = contents[7] as usize + 1;

        match chunks.len() {
            0 => chunks.resize(total, vec![]),
            l if l != total => bail!(
                "inconsistent count of total FLIR segments: {} != {}",
                l,
                total
            ),
            l if l <= current => bail!("FLIR segment idx out of bounds: {} >= {}", current, l),
            _ => (),
        }

        let chunk = &mut chunks[current];
        ensure!(chunk.is_empty(), "duplicate FLIR segment: idx = {}", current);

        chunk.extend_from_slice(&contents[8..]);
        num_copied += 1;
        total_len += chunk.len();
    }

    ensure!(
        num_copied == chunks.len(),
        "expected {} FLIR segments, found only {}",
        chunks.len(),
        num_copied
    );

    let mut data = Vec::with_capacity(total_len);
    for chunk in chunks {
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

// # FLIR file header (ref 3)
// # 0x00 - string[4] file format ID = "FFF\0"
// # 0x04 - string[16] file creator: seen "\0","MTX IR\0","CAMCTRL\0"
// # 0x14 - int32u file format version = 100
// # 0x18 - int32u offset to record directory
// # 0x1c - int32u number of entries in record directory
fn segment_endianness(data: &[u8]) -> Result<Endianness> {
    ensure!(
        data.len() >= 0x20,
        "FLIR data too short for FFF header: {} bytes",
        data.len()
    );
    ensure!(&data[0..4] == b"FFF\0", "unexpected signature in FLIR data");

    let version = ByteOrdered::le(&data[0x14..]).read_u32()?;
    Ok(if (100..200).contains(&version) {
        Endianness::Little
    } else {
        Endianness::Big
    })
}

fn parse_record_directory(data: &[u8]) -> Result<Vec<FlirRecordDirEntry>> {
    let endianness = segment_endianness(data)?;

    let mut rdr = ByteOrdered::runtime(&data[0x18..], endianness);
    let dir_offset = rdr.read_u32()? as usize;
    let num_entries = rdr.read_u32()?;

    let dir = data
        .get(dir_offset..)
        .ok_or_else(|| anyhow!("record directory at {:#x} past end of FLIR data", dir_offset))?;
    let mut rdr = ByteOrdered::runtime(dir, endianness);

    (0..num_entries)
        .map(|_| FlirRecordDirEntry::parse(&mut rdr))
        .collect()
}

// # FLIR record entry (ref 3):
// # 0x00 - int16u record type
// # 0x02 - int16u record subtype: RawData 1=BE, 2=LE, 3=PNG; 1 for other record types
// # 0x04 - int32u record version
// # 0x08 - int32u index id = 1
// # 0x0c - int32u record offset from start of FLIR data
// # 0x10 - int32u record length
// # 0x14 - int32u parent = 0 (?)
// # 0x18 - int32u object number = 0 (?)
// # 0x1c - int32u checksum: 0 for no checksum
#[derive(Debug)]
#[allow(dead_code)]
pub struct FlirRecordDirEntry {
    ty: u16,
    sub_type: u16,
    version: u32,

    id: u32,
    offset: u32,
    length: u32,

    parent: u32,
    obj_num: u32,
    checksum: u32,
}

impl FlirRecordDirEntry {
    fn parse<R: Read>(r: &mut ByteOrdered<R, Endianness>) -> Result<Self> {
        Ok(FlirRecordDirEntry {
            ty: r.read_u16()?,
            sub_type: r.read_u16()?,
            version: r.read_u32()?,
            id: r.read_u32()?,
            offset: r.read_u32()?,
            length: r.read_u32()?,
            parent: r.read_u32()?,
            obj_num: r.read_u32()?,
            checksum: r.read_u32()?,
        })
    }

    fn data<'a>(&self, segment: &'a [u8]) -> Option<&'a [u8]> {
        segment.get(self.offset as usize..(self.offset as usize + self.length as usize))
    }

    pub fn try_parse_raw_counts(&self, segment: &[u8]) -> Result<Option<Array2<u16>>> {
        if self.ty != RAW_DATA_RECORD {
            return Ok(None);
        }
        ensure!(
            self.sub_type != PNG_SUB_TYPE,
            "PNG type raw data not yet supported"
        );

        let data = self
            .data(segment)
            .ok_or_else(|| anyhow!("unexpected end of FLIR segment while reading record"))?;

        ensure!(
            data.len() > 6,
            "raw data record size mismatch: expected at least 6 bytes, found {}",
            data.len(),
        );

        // first word of the record encodes its byte order: 2 = LE
        let endianness = if u16::from_le_bytes([data[0], data[1]]) == 2 {
            Endianness::Little
        } else {
            Endianness::Big
        };

        let mut rdr = ByteOrdered::runtime(&data[2..], endianness);
        let width = rdr.read_u16()? as usize;
        let height = rdr.read_u16()? as usize;
        let expected = 2 * (16 + width * height);

        ensure!(
            data.len() == expected,
            "raw data record size mismatch: expected {} bytes, found {}",
            expected,
            data.len()
        );

        let mut rdr = ByteOrdered::runtime(&data[0x20..], endianness);
        let mut counts = Vec::with_capacity(width * height);
        for _ in 0..width * height {
            counts.push(rdr.read_u16()?);
        }

        Ok(Some(Array2::from_shape_vec((height, width), counts)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_data_record(width: u16, height: u16, counts: &[u16], le: bool) -> Vec<u8> {
        assert_eq!(counts.len(), width as usize * height as usize);
        let put = |v: u16| if le { v.to_le_bytes() } else { v.to_be_bytes() };

        let mut rec = vec![0u8; 0x20];
        rec[0..2].copy_from_slice(&put(if le { 2 } else { 1 }));
        rec[2..4].copy_from_slice(&put(width));
        rec[4..6].copy_from_slice(&put(height));
        for &c in counts {
            rec.extend_from_slice(&put(c));
        }
        rec
    }

    /// FFF header + one-entry record directory + raw data record.
    fn fff_segment(width: u16, height: u16, counts: &[u16]) -> Vec<u8> {
        let mut data = vec![0u8; 0x60];
        data[0..4].copy_from_slice(b"FFF\0");
        data[0x14..0x18].copy_from_slice(&100u32.to_le_bytes());
        data[0x18..0x1c].copy_from_slice(&0x40u32.to_le_bytes());
        data[0x1c..0x20].copy_from_slice(&1u32.to_le_bytes());

        let rec = raw_data_record(width, height, counts, true);

        // directory entry at 0x40, record data at 0x60
        data[0x40..0x42].copy_from_slice(&RAW_DATA_RECORD.to_le_bytes());
        data[0x42..0x44].copy_from_slice(&2u16.to_le_bytes());
        data[0x4c..0x50].copy_from_slice(&0x60u32.to_le_bytes());
        data[0x50..0x54].copy_from_slice(&(rec.len() as u32).to_le_bytes());

        data.extend_from_slice(&rec);
        data
    }

    fn app1_payload(idx: u8, last: u8, chunk: &[u8]) -> Vec<u8> {
        let mut seg = b"FLIR\0\x01".to_vec();
        seg.push(idx);
        seg.push(last);
        seg.extend_from_slice(chunk);
        seg
    }

    #[test]
    fn collects_multiple_segments_in_index_order() -> Result<()> {
        let data = fff_segment(2, 2, &[1, 2, 3, 4]);
        let (a, b) = data.split_at(data.len() / 2);

        // out of order on purpose
        let segments = vec![app1_payload(1, 1, b), app1_payload(0, 1, a)];
        let collected = collect_flir_data(segments.iter().map(|s| &s[..]))?;
        assert_eq!(collected, data);
        Ok(())
    }

    #[test]
    fn skips_non_flir_segments() -> Result<()> {
        let data = fff_segment(1, 1, &[7]);
        let segments = vec![b"Exif\0\0rest".to_vec(), app1_payload(0, 0, &data)];
        assert_eq!(collect_flir_data(segments.iter().map(|s| &s[..]))?, data);
        Ok(())
    }

    #[test]
    fn rejects_duplicate_segment_index() {
        let segments = vec![app1_payload(0, 1, b"ab"), app1_payload(0, 1, b"cd")];
        let err = collect_flir_data(segments.iter().map(|s| &s[..])).unwrap_err();
        assert!(err.to_string().contains("duplicate FLIR segment"));
    }

    #[test]
    fn rejects_missing_segments() {
        let segments = vec![app1_payload(0, 2, b"ab")];
        let err = collect_flir_data(segments.iter().map(|s| &s[..])).unwrap_err();
        assert!(err.to_string().contains("found only"));
    }

    #[test]
    fn parses_raw_counts_from_fff_data() -> Result<()> {
        let counts = [10u16, 20, 30, 40, 50, 60];
        let data = fff_segment(3, 2, &counts);

        let dir = parse_record_directory(&data)?;
        assert_eq!(dir.len(), 1);

        let raw = dir[0]
            .try_parse_raw_counts(&data)?
            .expect("raw data record");
        assert_eq!(raw.dim(), (2, 3));
        assert_eq!(raw[(0, 0)], 10);
        assert_eq!(raw[(1, 2)], 60);
        Ok(())
    }

    #[test]
    fn parses_big_endian_raw_record() -> Result<()> {
        let counts = [256u16, 513];
        let rec = raw_data_record(2, 1, &counts, false);

        let entry = FlirRecordDirEntry {
            ty: RAW_DATA_RECORD,
            sub_type: 1,
            version: 0x64,
            id: 1,
            offset: 0,
            length: rec.len() as u32,
            parent: 0,
            obj_num: 0,
            checksum: 0,
        };
        let raw = entry.try_parse_raw_counts(&rec)?.expect("raw data record");
        assert_eq!(raw[(0, 0)], 256);
        assert_eq!(raw[(0, 1)], 513);
        Ok(())
    }

    #[test]
    fn rejects_png_compressed_raw_record() {
        let entry = FlirRecordDirEntry {
            ty: RAW_DATA_RECORD,
            sub_type: PNG_SUB_TYPE,
            version: 0x64,
            id: 1,
            offset: 0,
            length: 8,
            parent: 0,
            obj_num: 0,
            checksum: 0,
        };
        assert!(entry.try_parse_raw_counts(&[0u8; 8]).is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(segment_endianness(&[0u8; 4]).is_err());
        assert!(segment_endianness(b"JUNKJUNKJUNKJUNKJUNKJUNKJUNKJUNK").is_err());
    }
}
