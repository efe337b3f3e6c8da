use descriptor_buffers::{BufferError, Reader, Writer};
use proptest::prelude::*;

proptest! {
    #[test]
    fn strings_and_integers_read_back_in_order(
        items in prop::collection::vec((".*", any::<u32>(), any::<u8>()), 0..32)
    ) {
        let mut writer = Writer::with_alloc_size(16);
        for (s, n, b) in &items {
            writer.str(s);
            writer.u32(*n);
            writer.u8(*b);
        }
        let data = writer.flush();

        let mut reader = Reader::new(&data);
        for (s, n, b) in &items {
            prop_assert_eq!(reader.try_str().unwrap(), s.as_str());
            prop_assert_eq!(reader.try_u32().unwrap(), *n);
            prop_assert_eq!(reader.try_u8().unwrap(), *b);
        }
        prop_assert_eq!(reader.size(), 0);
        prop_assert_eq!(reader.try_u8(), Err(BufferError::EndOfBuffer));
    }
}

#[test]
fn u32_is_big_endian() {
    let mut writer = Writer::new();
    writer.u32(0xfffe_0001);
    let data = writer.flush();
    assert_eq!(data, [0xff, 0xfe, 0x00, 0x01]);
    let mut reader = Reader::new(&data);
    assert_eq!(reader.try_u32(), Ok(0xfffe_0001));
    assert_eq!(reader.try_u8(), Err(BufferError::EndOfBuffer));
}
