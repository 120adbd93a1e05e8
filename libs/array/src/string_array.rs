use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::iter::FromIterator;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};

use crate::bitmap::{Bitmap, BitmapBuilder};
use crate::{Array, ArrayBuilder, ArrayRef, DataType};

/// Array builder for string.
pub struct StringBuilder {
    offsets: Vec<u32>,
    content: BytesMut,
    bitmap: BitmapBuilder,
}

impl Default for StringBuilder {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl ArrayBuilder for StringBuilder {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StringBuilder {
    #[inline]
    pub fn with_capacity(size: usize) -> Self {
        let mut offsets = Vec::with_capacity(size + 1);
        offsets.push(0);
        Self {
            offsets,
            content: BytesMut::new(),
            bitmap: BitmapBuilder::with_capacity(size),
        }
    }

    #[inline]
    pub fn append(&mut self, value: &str) {
        self.content.put_slice(value.as_bytes());
        self.offsets.push(self.content.len() as u32);
        self.bitmap.append(true);
    }

    #[inline]
    pub fn append_null(&mut self) {
        self.offsets.push(self.content.len() as u32);
        self.bitmap.append(false);
    }

    #[inline]
    pub fn append_opt(&mut self, value: Option<&str>) {
        match value {
            Some(value) => self.append(value),
            None => self.append_null(),
        }
    }

    pub fn finish(self) -> StringArray {
        StringArray::Array {
            offset: 0,
            len: self.offsets.len() - 1,
            offsets: self.offsets.into(),
            content: self.content.freeze(),
            bitmap: self.bitmap.finish(),
        }
    }
}

/// An array where each element is a variable-sized sequence of bytes representing a string.
///
/// Element `i` of the array spans `content[offsets[offset + i]..offsets[offset + i + 1]]`.
pub enum StringArray {
    Array {
        offset: usize,
        len: usize,
        offsets: Arc<[u32]>,
        content: Bytes,
        bitmap: Option<Bitmap>,
    },
    Scalar {
        len: usize,
        value: Option<Arc<str>>,
    },
}

impl Clone for StringArray {
    fn clone(&self) -> Self {
        match self {
            StringArray::Array {
                offset,
                len,
                offsets,
                content,
                bitmap,
            } => StringArray::Array {
                offset: *offset,
                len: *len,
                offsets: offsets.clone(),
                content: content.clone(),
                bitmap: bitmap.clone(),
            },
            StringArray::Scalar { len, value } => StringArray::Scalar {
                len: *len,
                value: value.clone(),
            },
        }
    }
}

impl Debug for StringArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut ls = f.debug_list();
        for value in self.iter_opt() {
            ls.entry(&value);
        }
        ls.finish()
    }
}

impl Array for StringArray {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn data_type(&self) -> DataType {
        DataType::String
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            StringArray::Array { len, .. } => *len,
            StringArray::Scalar { len, .. } => *len,
        }
    }

    fn slice(&self, offset: usize, length: usize) -> ArrayRef {
        if offset + length > self.len() {
            panic!(
                "offset+length (is {}) should be <= len (is {})",
                offset + length,
                self.len()
            );
        }

        match self {
            StringArray::Array {
                offset: current,
                offsets,
                content,
                bitmap,
                ..
            } => Arc::new(StringArray::Array {
                offset: current + offset,
                len: length,
                offsets: offsets.clone(),
                content: content.clone(),
                bitmap: bitmap.as_ref().map(|bitmap| bitmap.offset(offset)),
            }),
            StringArray::Scalar { value, .. } => Arc::new(Self::Scalar {
                len: length,
                value: value.clone(),
            }),
        }
    }

    fn is_valid(&self, index: usize) -> bool {
        if index >= self.len() {
            panic!("index (is {}) should be < len (is {})", index, self.len());
        }

        match self {
            StringArray::Array { bitmap, .. } => match &bitmap {
                Some(bitmap) => bitmap.is_valid(index),
                None => true,
            },
            StringArray::Scalar { value, .. } => value.is_some(),
        }
    }

    fn null_count(&self) -> usize {
        (0..self.len()).filter(|index| self.is_null(*index)).count()
    }

    fn memory_size(&self) -> usize {
        match self {
            StringArray::Array {
                offset,
                len,
                offsets,
                bitmap,
                ..
            } => {
                let content_len = (offsets[offset + len] - offsets[*offset]) as usize;
                content_len
                    + len * std::mem::size_of::<u32>()
                    + bitmap.as_ref().map(|_| (len + 7) / 8).unwrap_or_default()
            }
            StringArray::Scalar { value, .. } => value.as_ref().map(|s| s.len()).unwrap_or_default(),
        }
    }
}

impl PartialEq for StringArray {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter_opt().eq(other.iter_opt())
    }
}

impl<A: AsRef<str>> FromIterator<A> for StringArray {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut builder = StringBuilder::with_capacity(iter.size_hint().0);
        for value in iter {
            builder.append(value.as_ref());
        }
        builder.finish()
    }
}

impl StringArray {
    #[inline]
    pub fn new_scalar(len: usize, value: Option<impl Into<Arc<str>>>) -> Self {
        Self::Scalar {
            len,
            value: value.map(Into::into),
        }
    }

    #[inline]
    pub fn is_scalar_array(&self) -> bool {
        matches!(self, StringArray::Scalar { .. })
    }

    #[inline]
    pub fn to_scalar(&self) -> Option<Option<&str>> {
        match self {
            StringArray::Array { .. } => None,
            StringArray::Scalar { value, .. } => Some(value.as_deref()),
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::from_iter(std::iter::empty::<&str>())
    }

    pub fn from_vec<A: AsRef<str>>(values: Vec<A>) -> Self {
        Self::from_iter(values)
    }

    pub fn from_opt_vec<A: AsRef<str>>(values: Vec<Option<A>>) -> Self {
        let mut builder = StringBuilder::with_capacity(values.len());
        for value in &values {
            builder.append_opt(value.as_ref().map(AsRef::as_ref));
        }
        builder.finish()
    }

    /// Returns the value at `index`, null slots read as an empty string.
    #[inline]
    pub fn value(&self, index: usize) -> &str {
        if index >= self.len() {
            panic!("index (is {}) should be < len (is {})", index, self.len());
        }

        match self {
            StringArray::Array {
                offset,
                offsets,
                content,
                ..
            } => {
                let start = offsets[offset + index] as usize;
                let end = offsets[offset + index + 1] as usize;
                // The builder only ever appends whole `&str` values.
                unsafe { std::str::from_utf8_unchecked(&content[start..end]) }
            }
            StringArray::Scalar { value, .. } => value.as_deref().unwrap_or_default(),
        }
    }

    #[inline]
    pub fn value_opt(&self, index: usize) -> Option<&str> {
        if self.is_valid(index) {
            Some(self.value(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        (0..self.len()).map(move |index| self.value(index))
    }

    #[inline]
    pub fn iter_opt(&self) -> impl DoubleEndedIterator<Item = Option<&str>> + '_ {
        (0..self.len()).map(move |index| self.value_opt(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayExt;

    #[test]
    fn test_builder() {
        let mut builder = StringBuilder::default();
        builder.append("abc");
        builder.append_null();
        builder.append("");
        builder.append("de");
        assert_eq!(builder.len(), 4);

        let array = builder.finish();
        assert_eq!(array.len(), 4);
        assert_eq!(array.null_count(), 1);
        assert_eq!(
            array.iter_opt().collect::<Vec<_>>(),
            vec![Some("abc"), None, Some(""), Some("de")]
        );
    }

    #[test]
    fn test_nested_slice() {
        let array = StringArray::from_vec(vec!["a", "bb", "ccc", "dddd", "eeeee"]);
        let slice = array.slice(1, 4);
        let nested = slice.slice(1, 2);
        let nested = nested.downcast_ref::<StringArray>();
        assert_eq!(nested.iter().collect::<Vec<_>>(), vec!["ccc", "dddd"]);
    }

    #[test]
    fn test_memory_size() {
        let array = StringArray::from_vec(vec!["ab", "cd"]);
        assert_eq!(array.memory_size(), 4 + 8);
        assert_eq!(array.slice(1, 1).memory_size(), 2 + 4);

        let scalar = StringArray::new_scalar(100, Some("xyz"));
        assert_eq!(scalar.memory_size(), 3);
    }

    #[test]
    fn test_scalar() {
        let array = StringArray::new_scalar(3, Some("a"));
        assert_eq!(array.value(2), "a");
        assert_eq!(array.to_scalar(), Some(Some("a")));
        assert_eq!(array, StringArray::from_vec(vec!["a", "a", "a"]));
    }
}
