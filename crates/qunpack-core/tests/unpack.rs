use qunpack_core::{GroupKind, UnpackError, Value, pack, unpack};
use serde_json::{Value as Json, json};

fn unpack_json(format: &str, bytes: &[u8], offset: i64) -> Json {
    let values = unpack(format, bytes, offset).expect("unpack");
    serde_json::to_value(values).expect("values json")
}

fn single(format: &str, bytes: &[u8], offset: i64) -> Value {
    let mut values = unpack(format, bytes, offset).expect("unpack");
    assert_eq!(values.len(), 1, "expected one value for {format:?}");
    values.remove(0)
}

#[test]
fn array_groups_yield_sibling_sequences() {
    assert_eq!(
        unpack_json("C[3 C2]C", &[1, 2, 3, 4, 5, 6, 7, 8], 0),
        json!([1, [2, 3], [4, 5], [6, 7], 8])
    );
}

#[test]
fn record_groups_yield_sibling_mappings() {
    assert_eq!(
        unpack_json("C{2 a:C, x:X1, b:S}", &[1, 1, 2, 3, 4, 5, 6], 0),
        json!([1, {"a": 1, "b": 0x0102}, {"a": 3, "b": 0x0304}])
    );
}

#[test]
fn escaped_field_name() {
    assert_eq!(unpack_json(r"{a\:b:C}", &[9, 9], 0), json!([{"a:b": 9}]));
    assert_eq!(unpack_json(r"{a\\b:C}", &[9, 9], 0), json!([{r"a\b": 9}]));
}

#[test]
fn empty_fields_are_omitted_and_repeats_are_packed() {
    let values = unpack("{a:C, b:X, c:C2, d:@0, e:C}", &[1, 2, 3, 4, 5, 6], 0).expect("unpack");
    assert_eq!(
        serde_json::to_value(&values).expect("values json"),
        json!([{"a": 1, "c": [1, 2], "e": 1}])
    );
    let record = values[0].as_mapping().expect("record");
    let keys: Vec<_> = record.keys().collect();
    assert_eq!(keys, ["a", "c", "e"]);

    assert_eq!(unpack_json("{a:C0, b:C}", &[7], 0), json!([{"b": 7}]));
    assert_eq!(unpack_json("{n:Z+0}", b"ab\0", 0), json!([{}]));
}

#[test]
fn nested_records_keep_names() {
    assert_eq!(
        unpack_json("{hdr:{id:n, len:C}, body:a2}", &[0, 7, 2, b'h', b'i'], 0),
        json!([{"hdr": {"id": 7, "len": 2}, "body": "hi"}])
    );
    assert_eq!(
        unpack_json("{outer:{+inner:C}}", &[5], 0),
        json!([{"outer": {"inner": 5}}])
    );
}

#[test]
fn arrays_inside_records_take_no_names() {
    assert_eq!(
        unpack_json("{n:C, pts:[2 C C]}", &[2, 1, 2, 3, 4], 0),
        json!([{"n": 2, "pts": [[1, 2], [3, 4]]}])
    );
    assert_eq!(
        unpack_json("[{k:C}]", &[8], 0),
        json!([[{"k": 8}]])
    );
}

#[test]
fn stray_closers_are_ignored() {
    assert_eq!(
        unpack_json("]C]C]C]C]]", &[1, 2, 3, 4], 0),
        json!([1, 2, 3, 4])
    );
}

#[test]
fn format_errors() {
    assert!(matches!(
        unpack("{ a", &[1, 2], 0),
        Err(UnpackError::UnterminatedFieldName { .. })
    ));
    assert_eq!(
        unpack("C[C", &[1, 2], 0).unwrap_err(),
        UnpackError::UnterminatedGroup {
            kind: GroupKind::Array
        }
    );
    assert_eq!(
        unpack("{0 a:C}", &[1, 2], 0).unwrap_err(),
        UnpackError::ZeroGroupRepeat {
            kind: GroupKind::Record
        }
    );
    assert!(matches!(
        unpack("{a C}", &[1], 0),
        Err(UnpackError::UnterminatedFieldName { .. })
    ));
    assert!(matches!(
        unpack("C4000000000", &[1], 0),
        Err(UnpackError::TooManyValues { .. })
    ));
}

#[test]
fn long_field_name_preview_is_truncated() {
    let err = unpack("{a_really_long_field_name_without_colon}", &[], 0).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("a_really_long_field_..."), "{msg}");
    assert!(!msg.contains("without_colon"), "{msg}");
}

#[test]
fn numbers_at_offsets() {
    let buf = [128, 0, 0, 128];
    assert_eq!(single("S", &buf, 0), Value::from(0x8000u64));
    assert_eq!(single("s", &buf, 0), Value::from(-0x8000i64));
    assert_eq!(single("S", &buf, 2), Value::from(128u64));
    assert!(single("S", &buf, 3).is_nan());

    let buf = [128, 0, 0, 0, 0, 128];
    assert_eq!(single("L", &buf, 0), Value::from(0x8000_0000u64));
    assert_eq!(single("l", &buf, 0), Value::from(-0x8000_0000i64));
    assert_eq!(single("N", &buf, 2), Value::from(128u64));
    assert!(single("L", &buf, 3).is_nan());

    let buf = [1, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(single("J", &buf, 0), Value::from(0x0102_0304_0506_0708u64));
    assert_eq!(single("P", &buf, 0), Value::from(0x0807_0605_0403_0201u64));
    assert_eq!(single("q<", &buf, 0), Value::from(0x0807_0605_0403_0201i64));
    assert_eq!(single("V", &buf, 4), Value::from(0x0807_0605u64));
    assert_eq!(single("v", &buf, 6), Value::from(0x0807u64));
    assert_eq!(single("s<", &[0xfe, 0xff], 0), Value::from(-2i64));
}

#[test]
fn negative_offset_starts_at_zero() {
    assert_eq!(unpack_json("C", &[42, 43], -3), json!([42]));
}

#[test]
fn floats_in_both_byte_orders() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1234.5f32.to_be_bytes());
    buf.extend_from_slice(&1234.5f32.to_le_bytes());
    buf.extend_from_slice(&(-1e-10f64).to_be_bytes());
    buf.extend_from_slice(&(-1e-10f64).to_le_bytes());
    assert_eq!(
        unpack_json("G g E e", &buf, 0),
        json!([1234.5, 1234.5, -1e-10, -1e-10])
    );
    assert_eq!(unpack_json("f d<", &buf[..4], 0)[0], json!(1234.5));
}

#[test]
fn float_overrun_is_nan() {
    let values = unpack("f d", &[0, 0, 0], 0).expect("unpack");
    assert!(values.iter().all(Value::is_nan));
}

#[test]
fn strings() {
    assert_eq!(
        unpack_json("a2 A4 Z4", b"abcd  ef\0\0", 0),
        json!(["ab", "cd", "ef"])
    );
    assert_eq!(unpack_json("A40", b"abcd    ", 2), json!(["cd"]));
    assert_eq!(unpack_json("Z40", b"abcd\0\0\0\0", 2), json!(["cd"]));
    assert_eq!(
        unpack_json("H3 h3", &[0x12, 0x34, 0x12, 0x34], 0),
        json!(["123", "214"])
    );
}

#[test]
fn nul_terminated_strings() {
    assert_eq!(
        unpack_json("Z+Z+C", b"ab\0cd\0\x05", 0),
        json!(["ab", "cd", 5])
    );
    assert_eq!(unpack_json("Z+2", b"ab\0cd", 0), json!(["ab", "cd"]));
    assert_eq!(unpack_json("Z+", b"ab\0cd", 1), json!(["b"]));
}

#[test]
fn seeks() {
    let buf = [1, 2, 3, 4, 5, 6];
    assert_eq!(unpack_json("SxS", &buf, 0), json!([0x0102, 0x0405]));
    assert_eq!(unpack_json("Sx2S", &buf, 0), json!([0x0102, 0x0506]));
    assert_eq!(unpack_json("SXS", &buf, 0), json!([0x0102, 0x0203]));
    assert_eq!(unpack_json("SSX3S", &buf, 0), json!([0x0102, 0x0304, 0x0203]));
    assert_eq!(
        unpack_json("SS@1S@2S", &buf[..4], 0),
        json!([0x0102, 0x0304, 0x0203, 0x0304])
    );
}

#[test]
fn unpack_is_deterministic() {
    let buf = [9, 8, 7, 6, 5];
    let first = unpack("{a:n, b:[2 C]}", &buf, 0).expect("unpack");
    let second = unpack("{a:n, b:[2 C]}", &buf, 0).expect("unpack");
    assert_eq!(first, second);
}

#[test]
fn pack_reports_not_implemented() {
    let err = pack("a3", &[Value::from("abc")]).unwrap_err();
    assert_eq!(err, UnpackError::NotImplemented { operation: "pack" });
}
