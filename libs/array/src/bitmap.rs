use bytes::{BufMut, Bytes, BytesMut};

/// Builds a validity bitmap one slot at a time, a set bit marks a valid slot.
#[derive(Default)]
pub struct BitmapBuilder {
    data: BytesMut,
    len: usize,
    null_count: usize,
}

impl BitmapBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity((capacity + 7) / 8),
            len: 0,
            null_count: 0,
        }
    }

    #[inline]
    pub fn append(&mut self, is_valid: bool) {
        if self.len % 8 == 0 {
            self.data.put_u8(0);
        }
        if is_valid {
            self.data.as_mut()[self.len / 8] |= 1 << (self.len % 8);
        } else {
            self.null_count += 1;
        }
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `None` when every appended slot is valid.
    pub fn finish(self) -> Option<Bitmap> {
        if self.null_count == 0 {
            return None;
        }
        Some(Bitmap {
            offset: 0,
            data: self.data.freeze(),
        })
    }
}

#[derive(Clone)]
pub struct Bitmap {
    offset: usize,
    data: Bytes,
}

impl Bitmap {
    pub fn offset(&self, offset: usize) -> Bitmap {
        Bitmap {
            offset: self.offset + offset,
            data: self.data.clone(),
        }
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        let index = index + self.offset;
        self.data
            .get(index / 8)
            .map(|x| (*x & (1 << (index % 8))) > 0)
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_bitmap() -> Bitmap {
        let mut builder = BitmapBuilder::default();
        for i in 0..20 {
            builder.append(!matches!(i, 0 | 5 | 8 | 13));
        }
        builder.finish().unwrap()
    }

    #[test]
    fn test_builder() {
        let mut builder = BitmapBuilder::with_capacity(16);
        for i in 0..16 {
            builder.append(i != 0 && i != 13);
        }
        assert_eq!(builder.len(), 16);
        assert_eq!(builder.data, [0xfe, 0xdf].as_ref());
    }

    #[test]
    fn test_all_valid() {
        let mut builder = BitmapBuilder::default();
        builder.append(true);
        builder.append(true);
        assert!(builder.finish().is_none());
    }

    #[test]
    fn test_bitmap() {
        let bitmap = create_bitmap();

        assert!(bitmap.is_null(0));
        assert!(bitmap.is_null(5));
        assert!(bitmap.is_null(8));
        assert!(bitmap.is_null(13));

        assert!(bitmap.is_valid(1));
        assert!(bitmap.is_valid(3));
        assert!(bitmap.is_valid(9));
        assert!(bitmap.is_valid(14));
    }

    #[test]
    fn test_offset() {
        let bitmap = create_bitmap().offset(3);

        assert!(bitmap.is_null(2));
        assert!(bitmap.is_null(5));
        assert!(bitmap.is_null(10));
        assert!(bitmap.is_valid(0));

        let bitmap = bitmap.offset(2);
        assert!(bitmap.is_null(0));
        assert!(bitmap.is_valid(1));
    }
}
