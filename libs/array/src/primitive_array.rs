use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bitmap::{Bitmap, BitmapBuilder};
use crate::{Array, ArrayBuilder, ArrayRef, DataType};

pub trait NativeType:
    Debug + Copy + Send + Sync + Default + PartialEq + PartialOrd + Serialize + DeserializeOwned + 'static
{
}

pub trait PrimitiveType: Copy + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    type Native: NativeType;

    fn byte_width() -> usize {
        std::mem::size_of::<Self::Native>()
    }
}

macro_rules! impl_native_types {
    ($($ty:ty),*) => {
        $(
        impl NativeType for $ty {}
        )*
    };
}

macro_rules! impl_primitive_types {
    ($(($pt:ident, $native_ty:ty, $dt:expr)),*) => {
        $(
        #[derive(Debug, Copy, Clone)]
        pub struct $pt;

        impl PrimitiveType for $pt {
            const DATA_TYPE: DataType = $dt;
            type Native = $native_ty;
        }
        )*
    };
}

impl_native_types!(i8, i16, i32, i64, f32, f64, bool);

impl_primitive_types!(
    (Int8Type, i8, DataType::Int8),
    (Int16Type, i16, DataType::Int16),
    (Int32Type, i32, DataType::Int32),
    (Int64Type, i64, DataType::Int64),
    (Float32Type, f32, DataType::Float32),
    (Float64Type, f64, DataType::Float64),
    (BooleanType, bool, DataType::Boolean),
    (TimestampType, i64, DataType::Timestamp(None))
);

/// Array builder for fixed-width primitive types.
pub struct PrimitiveBuilder<T: PrimitiveType> {
    data: Vec<T::Native>,
    bitmap: BitmapBuilder,
    _mark: PhantomData<T>,
}

impl<T: PrimitiveType> Default for PrimitiveBuilder<T> {
    fn default() -> Self {
        PrimitiveBuilder {
            data: Vec::new(),
            bitmap: BitmapBuilder::default(),
            _mark: PhantomData,
        }
    }
}

impl<T: PrimitiveType> ArrayBuilder for PrimitiveBuilder<T> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: PrimitiveType> PrimitiveBuilder<T> {
    #[inline]
    pub fn with_capacity(size: usize) -> Self {
        Self {
            data: Vec::with_capacity(size),
            bitmap: BitmapBuilder::with_capacity(size),
            _mark: PhantomData,
        }
    }

    #[inline]
    pub fn append(&mut self, value: T::Native) {
        self.data.push(value);
        self.bitmap.append(true);
    }

    #[inline]
    pub fn append_null(&mut self) {
        self.data.push(T::Native::default());
        self.bitmap.append(false);
    }

    #[inline]
    pub fn append_opt(&mut self, value: Option<T::Native>) {
        match value {
            Some(value) => self.append(value),
            None => self.append_null(),
        }
    }

    pub fn finish(self) -> PrimitiveArray<T> {
        let len = self.data.len();
        PrimitiveArray::Array {
            data: self.data.into(),
            offset: 0,
            len,
            bitmap: self.bitmap.finish(),
            _mark: PhantomData,
        }
    }
}

/// Array whose elements are of primitive types.
///
/// The `Scalar` variant repeats one value `len` times without materializing it.
pub enum PrimitiveArray<T: PrimitiveType> {
    Array {
        data: Arc<[T::Native]>,
        offset: usize,
        len: usize,
        bitmap: Option<Bitmap>,
        _mark: PhantomData<T>,
    },
    Scalar {
        len: usize,
        value: Option<T::Native>,
    },
}

impl<T: PrimitiveType> Clone for PrimitiveArray<T> {
    fn clone(&self) -> Self {
        match self {
            PrimitiveArray::Array {
                data,
                offset,
                len,
                bitmap,
                ..
            } => PrimitiveArray::Array {
                data: data.clone(),
                offset: *offset,
                len: *len,
                bitmap: bitmap.clone(),
                _mark: PhantomData,
            },
            PrimitiveArray::Scalar { len, value } => PrimitiveArray::Scalar {
                len: *len,
                value: *value,
            },
        }
    }
}

impl<T: PrimitiveType> Debug for PrimitiveArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut ls = f.debug_list();
        for value in self.iter_opt() {
            ls.entry(&value);
        }
        ls.finish()
    }
}

impl<T: PrimitiveType> Array for PrimitiveArray<T> {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            PrimitiveArray::Array { len, .. } => *len,
            PrimitiveArray::Scalar { len, .. } => *len,
        }
    }

    fn slice(&self, offset: usize, length: usize) -> ArrayRef {
        if offset > self.len() {
            panic!(
                "offset (is {}) should be <= len (is {})",
                offset,
                self.len()
            );
        }

        if offset + length > self.len() {
            panic!(
                "offset+length (is {}) should be <= len (is {})",
                offset + length,
                self.len()
            );
        }

        match self {
            PrimitiveArray::Array {
                data,
                offset: current,
                bitmap,
                ..
            } => Arc::new(Self::Array {
                data: data.clone(),
                offset: current + offset,
                len: length,
                bitmap: bitmap.as_ref().map(|bitmap| bitmap.offset(offset)),
                _mark: PhantomData,
            }),
            PrimitiveArray::Scalar { value, .. } => Arc::new(Self::Scalar {
                len: length,
                value: *value,
            }),
        }
    }

    #[inline]
    fn is_valid(&self, index: usize) -> bool {
        if index >= self.len() {
            panic!("index (is {}) should be < len (is {})", index, self.len());
        }

        match self {
            PrimitiveArray::Array { bitmap, .. } => match &bitmap {
                Some(bitmap) => bitmap.is_valid(index),
                None => true,
            },
            PrimitiveArray::Scalar { value, .. } => value.is_some(),
        }
    }

    fn null_count(&self) -> usize {
        match self {
            PrimitiveArray::Array { bitmap: None, .. } => 0,
            PrimitiveArray::Array { .. } => (0..self.len()).filter(|i| self.is_null(*i)).count(),
            PrimitiveArray::Scalar { len, value } => {
                if value.is_none() {
                    *len
                } else {
                    0
                }
            }
        }
    }

    fn memory_size(&self) -> usize {
        match self {
            PrimitiveArray::Array { len, bitmap, .. } => {
                len * T::byte_width() + bitmap.as_ref().map(|_| (len + 7) / 8).unwrap_or_default()
            }
            PrimitiveArray::Scalar { .. } => T::byte_width(),
        }
    }
}

impl<A: PrimitiveType> PartialEq for PrimitiveArray<A> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter_opt().eq(other.iter_opt())
    }
}

impl<A: PrimitiveType> FromIterator<<A as PrimitiveType>::Native> for PrimitiveArray<A> {
    fn from_iter<T: IntoIterator<Item = <A as PrimitiveType>::Native>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut builder = PrimitiveBuilder::with_capacity(iter.size_hint().0);
        for value in iter {
            builder.append(value);
        }
        builder.finish()
    }
}

impl<T: PrimitiveType> PrimitiveArray<T> {
    #[inline]
    pub fn new_scalar(len: usize, value: Option<T::Native>) -> Self {
        Self::Scalar { len, value }
    }

    #[inline]
    pub fn is_scalar_array(&self) -> bool {
        matches!(self, PrimitiveArray::Scalar { .. })
    }

    /// Returns `Some` if the array is scalar array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use winq_array::Int32Array;
    ///
    /// let array = Int32Array::new_scalar(100, Some(1));
    /// assert_eq!(array.to_scalar(), Some(Some(1)));
    ///
    /// let array = Int32Array::new_scalar(100, None);
    /// assert_eq!(array.to_scalar(), Some(None));
    ///
    /// let array = Int32Array::from_vec(vec![1, 2, 3]);
    /// assert_eq!(array.to_scalar(), None);
    /// ```
    #[inline]
    pub fn to_scalar(&self) -> Option<Option<T::Native>> {
        match self {
            PrimitiveArray::Array { .. } => None,
            PrimitiveArray::Scalar { value, .. } => Some(*value),
        }
    }

    /// Create an empty array.
    #[inline]
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(values: Vec<T::Native>) -> Self {
        let len = values.len();
        PrimitiveArray::Array {
            data: values.into(),
            offset: 0,
            len,
            bitmap: None,
            _mark: PhantomData,
        }
    }

    pub fn from_opt_vec(values: Vec<Option<T::Native>>) -> Self {
        let mut builder = PrimitiveBuilder::<T>::with_capacity(values.len());
        for value in values {
            builder.append_opt(value);
        }
        builder.finish()
    }

    #[inline]
    fn internal_value(&self, index: usize) -> T::Native {
        match self {
            PrimitiveArray::Array { data, offset, .. } => data[offset + index],
            PrimitiveArray::Scalar { value, .. } => value.unwrap_or_default(),
        }
    }

    /// Returns the value at `index`, null slots read as the default value.
    #[inline]
    pub fn value(&self, index: usize) -> T::Native {
        if index >= self.len() {
            panic!("index (is {}) should be < len (is {})", index, self.len());
        }
        self.internal_value(index)
    }

    #[inline]
    pub fn value_opt(&self, index: usize) -> Option<T::Native> {
        if self.is_valid(index) {
            Some(self.internal_value(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T::Native> + '_ {
        (0..self.len()).map(move |index| self.internal_value(index))
    }

    #[inline]
    pub fn iter_opt(&self) -> impl DoubleEndedIterator<Item = Option<T::Native>> + '_ {
        (0..self.len()).map(move |index| self.value_opt(index))
    }
}
