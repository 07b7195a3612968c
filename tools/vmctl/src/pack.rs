use crate::CliError;
use kernel_noff::{ByteOrder, NOFF_HEADER_SIZE, NoffHeader, Segment};
use std::fs;

/// `pack <code> <data> <bss-bytes> <out> [--swap]`
pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), CliError> {
    let usage = || CliError::Usage("usage: vmctl pack <code> <data> <bss-bytes> <out> [--swap]".into());
    let code_path = args.next().ok_or_else(usage)?;
    let data_path = args.next().ok_or_else(usage)?;
    let bss: u32 = args
        .next()
        .ok_or_else(usage)?
        .parse()
        .map_err(|_| usage())?;
    let out = args.next().ok_or_else(usage)?;
    let order = match args.next().as_deref() {
        None => ByteOrder::Native,
        Some("--swap") => ByteOrder::Swapped,
        Some(_) => return Err(usage()),
    };

    let code = fs::read(&code_path)?;
    let data = fs::read(&data_path)?;
    let image = build_image(&code, &data, bss, order)?;
    fs::write(&out, &image)?;
    eprintln!(
        "packed {} code + {} data + {bss} bss bytes into {out}",
        code.len(),
        data.len()
    );
    Ok(())
}

/// Lay out a NOFF image.
///
/// Code is placed at virtual address 0 and file offset [`NOFF_HEADER_SIZE`];
/// initialised data follows it in both the file and the address space, and
/// uninitialised data follows the initialised data in the address space.
pub fn build_image(
    code: &[u8],
    data: &[u8],
    bss: u32,
    order: ByteOrder,
) -> Result<Vec<u8>, CliError> {
    let too_large = || CliError::Usage("segments do not fit into a 32-bit image".into());
    let code_len = u32::try_from(code.len()).map_err(|_| too_large())?;
    let data_len = u32::try_from(data.len()).map_err(|_| too_large())?;
    let header_len = u32::try_from(NOFF_HEADER_SIZE).map_err(|_| too_large())?;
    let data_file = header_len.checked_add(code_len).ok_or_else(too_large)?;
    let bss_addr = code_len.checked_add(data_len).ok_or_else(too_large)?;

    let header = NoffHeader::new(
        Segment::new(0, header_len, code_len),
        Segment::new(code_len, data_file, data_len),
        Segment::new(bss_addr, 0, bss),
    );
    header.image_size().ok_or_else(too_large)?;

    let mut bytes = Vec::with_capacity(NOFF_HEADER_SIZE + code.len() + data.len());
    bytes.extend_from_slice(&header.to_bytes(order));
    bytes.extend_from_slice(code);
    bytes.extend_from_slice(data);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_places_data_after_code() {
        let image = build_image(&[1; 10], &[2; 6], 32, ByteOrder::Native).unwrap();
        let h = NoffHeader::parse(&image).unwrap();
        assert_eq!(h.code, Segment::new(0, 40, 10));
        assert_eq!(h.init_data, Segment::new(10, 50, 6));
        assert_eq!(h.uninit_data, Segment::new(16, 0, 32));
        assert_eq!(image.len(), 56);
        assert_eq!(image[50], 2);
    }

    #[test]
    fn swapped_images_decode_to_the_same_header() {
        let a = build_image(&[1; 3], &[], 0, ByteOrder::Native).unwrap();
        let b = build_image(&[1; 3], &[], 0, ByteOrder::Swapped).unwrap();
        assert_ne!(a[..4], b[..4]);
        assert_eq!(NoffHeader::parse(&a), NoffHeader::parse(&b));
    }
}
