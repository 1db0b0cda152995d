use bytes::{Bytes, BytesMut};
use ffv_array::Values;
use ffv_dtype::{NativePType, PType, match_each_native_ptype};
use ffv_error::{FfvResult, ffv_bail};

/// Decode a buffer of big-endian elements.
pub fn decode_values(mut bytes: Bytes, ptype: PType) -> FfvResult<Values> {
    let width = ptype.byte_width();
    if bytes.len() % width != 0 {
        ffv_bail!(
            Format: "{} bytes is not a whole number of {} values",
            bytes.len(),
            ptype
        );
    }
    let count = bytes.len() / width;
    Ok(match_each_native_ptype!(ptype, |$T| {
        let mut values: Vec<$T> = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(<$T>::get_be(&mut bytes));
        }
        Values::from(values)
    }))
}

/// Encode elements as big-endian values of the given type, converting them if necessary.
pub fn encode_values(values: &Values, ptype: PType) -> Bytes {
    let converted = values.cast(ptype);
    let mut buffer = BytesMut::with_capacity(values.len() * ptype.byte_width());
    match &converted {
        Values::I32(v) => v.iter().for_each(|x| x.put_be(&mut buffer)),
        Values::I64(v) => v.iter().for_each(|x| x.put_be(&mut buffer)),
        Values::F32(v) => v.iter().for_each(|x| x.put_be(&mut buffer)),
        Values::F64(v) => v.iter().for_each(|x| x.put_be(&mut buffer)),
    }
    buffer.freeze()
}
