// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Cross-lane movement: slices, permutations, blends, compress and expand.

use crate::{
    error::{Error, Result},
    lane::Lane,
    mask::MaskValue,
    util::floor_mod,
    vector::VectorValue,
};

fn check_origin(origin: usize, len: usize) -> Result<()> {
    if origin > len {
        return Err(Error::OutOfRange {
            index: origin as i64,
            len,
        });
    }
    Ok(())
}

fn check_mask(mask: Option<&MaskValue>, len: usize) -> Result<()> {
    match mask {
        Some(mask) => mask.ensure_len(len),
        None => Ok(()),
    }
}

/// `length` lanes of `v1 ++ v2` starting at `origin`. With a mask, inactive lanes are zero.
pub fn slice<T: Lane>(
    origin: usize,
    v1: &VectorValue<T>,
    v2: &VectorValue<T>,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    let len = v1.len();
    v2.ensure_len(len)?;
    check_origin(origin, len)?;
    check_mask(mask, len)?;
    let (a, b) = (v1.lanes(), v2.lanes());
    VectorValue::from_lanes(
        (0..len)
            .map(|i| {
                if mask.is_some_and(|m| !m.is_set(i)) {
                    T::zero()
                } else if i + origin < len {
                    a[i + origin]
                } else {
                    b[i + origin - len]
                }
            })
            .collect(),
    )
}

/// Slice against a zero vector: lanes shift down by `origin` and zeros fill the top.
pub fn slice_unary<T: Lane>(origin: usize, v: &VectorValue<T>) -> Result<VectorValue<T>> {
    slice(origin, v, &VectorValue::zero(v.len())?, None)
}

/// Inverse of [`slice`]: places `v` at `origin` inside `background ++ background` and returns
/// half `part` (0 or 1) of the result. With a mask, only the active lanes of `v` are inserted
/// and the background shows through elsewhere.
pub fn unslice<T: Lane>(
    origin: usize,
    v: &VectorValue<T>,
    background: &VectorValue<T>,
    part: usize,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    let len = v.len();
    background.ensure_len(len)?;
    check_origin(origin, len)?;
    if part > 1 {
        return Err(Error::OutOfRange {
            index: part as i64,
            len: 2,
        });
    }
    let inserted = match mask {
        Some(mask) => {
            let underneath = slice(origin, background, background, None)?;
            blend(&underneath, v, mask)?
        }
        None => v.clone(),
    };
    let (a, w) = (inserted.lanes(), background.lanes());
    VectorValue::from_lanes(
        (0..len)
            .map(|i| match (part, i < origin) {
                (0, true) => w[i],
                (0, false) => a[i - origin],
                (_, true) => a[len - origin + i],
                (_, false) => w[i],
            })
            .collect(),
    )
}

/// Unslice into zeros, first half.
pub fn unslice_unary<T: Lane>(origin: usize, v: &VectorValue<T>) -> Result<VectorValue<T>> {
    unslice(origin, v, &VectorValue::zero(v.len())?, 0, None)
}

/// Two-table lookup: `idx = floor_mod(index[i], 2 * length)` selects `v1[idx]` or
/// `v2[idx - length]`. Never traps.
pub fn select_from<T: Lane>(
    index: &VectorValue<T>,
    v1: &VectorValue<T>,
    v2: &VectorValue<T>,
) -> Result<VectorValue<T>> {
    let len = index.len();
    v1.ensure_len(len)?;
    v2.ensure_len(len)?;
    let (a, b) = (v1.lanes(), v2.lanes());
    VectorValue::from_lanes(
        index
            .lanes()
            .iter()
            .map(|x| {
                let idx = floor_mod(x.to_index(), 2 * len as i64) as usize;
                if idx < len { a[idx] } else { b[idx - len] }
            })
            .collect(),
    )
}

/// Lane `i` is `v[shuffle[i]]`. An index outside the vector on an active lane fails; inactive
/// lanes are zero.
pub fn rearrange<T: Lane>(
    v: &VectorValue<T>,
    shuffle: &[i64],
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    let len = v.len();
    if shuffle.len() != len {
        return Err(Error::ShapeMismatch {
            expected: len,
            found: shuffle.len(),
        });
    }
    check_mask(mask, len)?;
    let lanes = shuffle
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            if mask.is_some_and(|m| !m.is_set(i)) {
                return Ok(T::zero());
            }
            if index < 0 || index as u64 >= len as u64 {
                return Err(Error::OutOfRange { index, len });
            }
            Ok(v.lanes()[index as usize])
        })
        .collect::<Result<Vec<_>>>()?;
    VectorValue::from_lanes(lanes)
}

/// `mask ? b : a` per lane.
pub fn blend<T: Lane>(
    a: &VectorValue<T>,
    b: &VectorValue<T>,
    mask: &MaskValue,
) -> Result<VectorValue<T>> {
    b.ensure_len(a.len())?;
    mask.ensure_len(a.len())?;
    VectorValue::from_lanes(
        a.lanes()
            .iter()
            .zip(b.lanes())
            .enumerate()
            .map(|(i, (x, y))| if mask.is_set(i) { *y } else { *x })
            .collect(),
    )
}

/// Packs the active lanes of `v` into the low lanes, in order; the remaining lanes are zero.
pub fn compress<T: Lane>(v: &VectorValue<T>, mask: &MaskValue) -> Result<VectorValue<T>> {
    mask.ensure_len(v.len())?;
    let mut lanes: Vec<T> = v
        .lanes()
        .iter()
        .enumerate()
        .filter(|(i, _)| mask.is_set(*i))
        .map(|(_, x)| *x)
        .collect();
    lanes.resize(v.len(), T::zero());
    VectorValue::from_lanes(lanes)
}

/// Distributes the low lanes of `v`, in order, to the active lanes; inactive lanes are zero.
pub fn expand<T: Lane>(v: &VectorValue<T>, mask: &MaskValue) -> Result<VectorValue<T>> {
    mask.ensure_len(v.len())?;
    let mut source = v.lanes().iter();
    VectorValue::from_lanes(
        (0..v.len())
            .map(|i| {
                if mask.is_set(i) {
                    source.next().copied().unwrap_or_else(T::zero)
                } else {
                    T::zero()
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn vector(lanes: &[i32]) -> VectorValue<i32> {
        VectorValue::from_lanes(lanes.to_vec()).unwrap()
    }

    fn mask(bits: &[u8]) -> MaskValue {
        MaskValue::from_bools(bits.iter().map(|b| *b != 0).collect()).unwrap()
    }

    #[test]
    fn test_slice_edges() {
        let a = vector(&[0, 1, 2, 3]);
        let b = vector(&[4, 5, 6, 7]);
        assert_eq!(slice(0, &a, &b, None).unwrap(), a);
        assert_eq!(slice(4, &a, &b, None).unwrap(), b);
        assert_eq!(slice(1, &a, &b, None).unwrap().lanes(), &[1, 2, 3, 4]);
        assert_eq!(
            slice(5, &a, &b, None),
            Err(Error::OutOfRange { index: 5, len: 4 })
        );
        assert_eq!(
            slice(2, &a, &b, Some(&mask(&[1, 0, 0, 1]))).unwrap().lanes(),
            &[2, 0, 0, 5]
        );
        assert_eq!(slice_unary(3, &a).unwrap().lanes(), &[3, 0, 0, 0]);
    }

    #[test]
    fn test_unslice() {
        let v = vector(&[1, 2, 3, 4]);
        let w = vector(&[10, 20, 30, 40]);
        assert_eq!(unslice(1, &v, &w, 0, None).unwrap().lanes(), &[10, 1, 2, 3]);
        assert_eq!(unslice(1, &v, &w, 1, None).unwrap().lanes(), &[4, 20, 30, 40]);
        assert_eq!(unslice_unary(2, &v).unwrap().lanes(), &[0, 0, 1, 2]);
        // Lane 1 of v is inactive: the background lane it would cover is kept.
        assert_eq!(
            unslice(1, &v, &w, 0, Some(&mask(&[1, 0, 1, 1]))).unwrap().lanes(),
            &[10, 1, 30, 3]
        );
        assert!(unslice(1, &v, &w, 2, None).is_err());
    }

    #[test]
    fn test_unslice_inverts_slice() {
        let a = vector(&[1, 2, 3, 4]);
        let b = vector(&[5, 6, 7, 8]);
        for origin in 0..=4 {
            let s = slice(origin, &a, &b, None).unwrap();
            let low = unslice(origin, &s, &a, 0, None).unwrap();
            let high = unslice(origin, &s, &b, 1, None).unwrap();
            assert_eq!(low, a, "origin {origin}");
            assert_eq!(high, b, "origin {origin}");
        }
    }

    #[test]
    fn test_select_from_wraps() {
        let a = vector(&[0, 1, 2, 3]);
        let b = vector(&[4, 5, 6, 7]);
        let index = vector(&[-1, 4, 9, -8]);
        assert_eq!(select_from(&index, &a, &b).unwrap().lanes(), &[7, 4, 1, 0]);
    }

    #[test]
    fn test_rearrange() {
        let v = vector(&[10, 11, 12, 13]);
        assert_eq!(
            rearrange(&v, &[3, 3, 0, 1], None).unwrap().lanes(),
            &[13, 13, 10, 11]
        );
        assert_eq!(
            rearrange(&v, &[3, -1, 0, 7], None),
            Err(Error::OutOfRange { index: -1, len: 4 })
        );
        assert_eq!(
            rearrange(&v, &[3, -1, 0, 7], Some(&mask(&[1, 0, 1, 0])))
                .unwrap()
                .lanes(),
            &[13, 0, 10, 0]
        );
    }

    #[test]
    fn test_blend_compress_expand() {
        let a = vector(&[1, 2, 3, 4]);
        let b = vector(&[5, 6, 7, 8]);
        let m = mask(&[0, 1, 0, 1]);
        assert_eq!(blend(&a, &b, &m).unwrap().lanes(), &[1, 6, 3, 8]);
        let c = compress(&a, &m).unwrap();
        assert_eq!(c.lanes(), &[2, 4, 0, 0]);
        let e = expand(&c, &m).unwrap();
        assert_eq!(e.lanes(), &[0, 2, 0, 4]);
        assert_eq!(expand(&a, &m).unwrap().lanes(), &[0, 1, 0, 2]);
    }
}
