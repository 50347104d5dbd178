//! Index unwrapping for [`crate::CanonicalizationDataset::get`].
//!
//! Training loops hand over indices as plain integers or as one-element
//! containers (a collated sampler batch of size one). Both resolve to a
//! `usize` here; anything else is rejected.

use crate::error::{DatasetError, Result};

pub trait ItemIndex {
    fn to_item_index(&self) -> Result<usize>;
}

impl ItemIndex for usize {
    fn to_item_index(&self) -> Result<usize> {
        Ok(*self)
    }
}

macro_rules! impl_item_index_int {
    ($($t:ty),*) => {
        $(
            impl ItemIndex for $t {
                fn to_item_index(&self) -> Result<usize> {
                    usize::try_from(*self).map_err(|_| {
                        DatasetError::InvalidIndex(format!("{} is not a valid position", self))
                    })
                }
            }
        )*
    };
}

impl_item_index_int!(u32, u64, i32, i64);

impl<T: ItemIndex> ItemIndex for [T] {
    fn to_item_index(&self) -> Result<usize> {
        match self {
            [single] => single.to_item_index(),
            _ => Err(DatasetError::InvalidIndex(format!(
                "expected a single-element index, got {} elements",
                self.len()
            ))),
        }
    }
}

impl<T: ItemIndex, const N: usize> ItemIndex for [T; N] {
    fn to_item_index(&self) -> Result<usize> {
        self.as_slice().to_item_index()
    }
}

impl<T: ItemIndex> ItemIndex for Vec<T> {
    fn to_item_index(&self) -> Result<usize> {
        self.as_slice().to_item_index()
    }
}

impl<T: ItemIndex + ?Sized> ItemIndex for &T {
    fn to_item_index(&self) -> Result<usize> {
        (**self).to_item_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integers() {
        assert_eq!(3usize.to_item_index().unwrap(), 3);
        assert_eq!(3u32.to_item_index().unwrap(), 3);
        assert_eq!(3i64.to_item_index().unwrap(), 3);
        assert!(matches!((-1i64).to_item_index(), Err(DatasetError::InvalidIndex(_))));
    }

    #[test]
    fn single_element_containers_unwrap() {
        assert_eq!([5u64].to_item_index().unwrap(), 5);
        assert_eq!(vec![5i32].to_item_index().unwrap(), 5);
        let v = vec![9usize];
        assert_eq!(v.as_slice().to_item_index().unwrap(), 9);
    }

    #[test]
    fn other_shapes_are_rejected() {
        let empty: Vec<usize> = Vec::new();
        assert!(matches!(empty.to_item_index(), Err(DatasetError::InvalidIndex(_))));
        assert!(matches!([1usize, 2].to_item_index(), Err(DatasetError::InvalidIndex(_))));
    }
}
