use botw_lib::aamp::{
    Color4f, Curve, FixedSafeString, Name, Parameter, ParameterIO, ParameterList,
    ParameterObject, Quatf, Vector2f, Vector3f, Vector4f,
};
use botw_lib::{assert_hex_eq, Error};

#[test]
fn empty_archive_layout() {
    let pio = ParameterIO::new("xml");
    let data = pio.to_binary().unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"AAMP");
    expected.extend_from_slice(&2u32.to_le_bytes()); // version
    expected.extend_from_slice(&3u32.to_le_bytes()); // little endian | UTF-8
    expected.extend_from_slice(&64u32.to_le_bytes()); // file size
    expected.extend_from_slice(&0u32.to_le_bytes()); // pio version
    expected.extend_from_slice(&4u32.to_le_bytes()); // offset to the root list
    expected.extend_from_slice(&1u32.to_le_bytes()); // lists (including root)
    expected.extend_from_slice(&0u32.to_le_bytes()); // objects
    expected.extend_from_slice(&0u32.to_le_bytes()); // parameters
    expected.extend_from_slice(&0u32.to_le_bytes()); // data section size
    expected.extend_from_slice(&0u32.to_le_bytes()); // string section size
    expected.extend_from_slice(&0u32.to_le_bytes()); // unused
    expected.extend_from_slice(b"xml\0");
    expected.extend_from_slice(&crc32fast::hash(b"param_root").to_le_bytes());
    expected.extend_from_slice(&0u16.to_le_bytes()); // child lists offset
    expected.extend_from_slice(&0u16.to_le_bytes()); // child list count
    expected.extend_from_slice(&0u16.to_le_bytes()); // child objects offset
    expected.extend_from_slice(&0u16.to_le_bytes()); // child object count

    assert_hex_eq!(expected, &data);
    assert_eq!(ParameterIO::from_binary(&data).unwrap(), pio);
}

fn sample_archive() -> ParameterIO {
    let mut object = ParameterObject::default();
    object.insert("Enabled", Parameter::Bool(true));
    object.insert("Life", Parameter::Int(-100));
    object.insert("Attack", Parameter::U32(0xFFFF_FFFF));
    object.insert("Range", Parameter::Float(12.5));
    object.insert(
        "Position",
        Parameter::Vec3(Vector3f {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        }),
    );
    object.insert("Scale", Parameter::Vec2(Vector2f { x: 0.5, y: 0.5 }));
    object.insert(
        "Rotate",
        Parameter::Vec4(Vector4f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
            t: 1.0,
        }),
    );
    object.insert(
        "Tint",
        Parameter::Color(Color4f {
            r: 1.0,
            g: 0.25,
            b: 0.0,
            a: 1.0,
        }),
    );
    object.insert(
        "Orientation",
        Parameter::Quat(Quatf {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
        }),
    );
    object.insert(
        "User",
        Parameter::String32(FixedSafeString::new("Lynel").unwrap()),
    );
    object.insert(
        "Profile",
        Parameter::String64(FixedSafeString::new("EnemyBase").unwrap()),
    );
    object.insert(
        "Path",
        Parameter::String256(FixedSafeString::new("Actor/Pack/Enemy_Lynel.sbactorpack").unwrap()),
    );
    // Identical strings are deduplicated in the string section.
    object.insert("UserDup", Parameter::StringRef("Lynel".to_string()));
    object.insert("Rates", Parameter::BufferF32(vec![0.5, 1.5, -2.0]));
    object.insert("Counts", Parameter::BufferInt(vec![-1, 2, 3]));
    object.insert("Ids", Parameter::BufferU32(vec![7, 8]));
    object.insert("Blob", Parameter::BufferBinary(vec![1, 2, 3, 4, 5]));
    object.insert(
        "Ease",
        Parameter::Curve1(Box::new([Curve {
            a: 1,
            b: 2,
            floats: [0.25; 30],
        }])),
    );

    let mut child = ParameterList::default();
    let mut child_object = ParameterObject::default();
    child_object.insert("IsOn", Parameter::Bool(false));
    child.objects.insert(Name::from("Config"), child_object);

    let mut pio = ParameterIO::new("xml");
    pio.version = 3;
    pio.param_root.objects.insert(Name::from("General"), object);
    pio.param_root.lists.insert(Name::from("Children"), child);
    pio
}

#[test]
fn round_trip_covers_every_parameter_type() {
    let pio = sample_archive();
    let data = pio.to_binary().unwrap();
    let parsed = ParameterIO::from_binary(&data).unwrap();
    assert_eq!(parsed, pio);
    // Byte-exact when re-serialized.
    assert_hex_eq!(&data, parsed.to_binary().unwrap());
}

#[test]
fn malformed_headers_are_rejected() {
    let data = sample_archive().to_binary().unwrap();

    let mut bad_magic = data.clone();
    bad_magic[0] = b'B';
    assert!(ParameterIO::from_binary(&bad_magic).is_err());

    let mut bad_version = data.clone();
    bad_version[4] = 3;
    assert!(ParameterIO::from_binary(&bad_version).is_err());

    let mut big_endian = data.clone();
    big_endian[8] = 0;
    assert!(ParameterIO::from_binary(&big_endian).is_err());

    let mut oversized = data.clone();
    oversized[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(ParameterIO::from_binary(&oversized).is_err());

    assert!(ParameterIO::from_binary(&data[..0x20]).is_err());
}

#[test]
fn unknown_parameter_type_is_rejected() {
    // One object with one parameter: the parameter entry's type byte is
    // the high byte of the u32 at entry offset 4.
    let mut pio = ParameterIO::new("xml");
    let mut object = ParameterObject::default();
    object.insert("Enabled", Parameter::Bool(true));
    pio.param_root.objects.insert(Name::from("General"), object);
    let mut data = pio.to_binary().unwrap();

    // header (0x30) + "xml\0" (4) + root list (12) + object entry (8)
    let param_entry = 0x30 + 4 + 12 + 8;
    data[param_entry + 7] = 99;
    match ParameterIO::from_binary(&data) {
        Err(Error::InvalidData(message)) => {
            assert!(message.contains("unknown parameter type"), "{message}")
        }
        other => panic!("expected an error, got {other:?}"),
    }
}

#[test]
fn duplicate_name_hashes_are_rejected() {
    let mut pio = ParameterIO::new("xml");
    let mut object = ParameterObject::default();
    object.insert("Enabled", Parameter::Bool(true));
    object.insert("Life", Parameter::Int(1));
    pio.param_root.objects.insert(Name::from("General"), object);
    let mut data = pio.to_binary().unwrap();

    // Overwrite the second parameter entry's name with the first one's.
    let params = 0x30 + 4 + 12 + 8;
    let first_name: Vec<u8> = data[params..params + 4].to_vec();
    data[params + 8..params + 12].copy_from_slice(&first_name);
    match ParameterIO::from_binary(&data) {
        Err(Error::InvalidData(message)) => assert!(message.contains("duplicate"), "{message}"),
        other => panic!("expected an error, got {other:?}"),
    }
}
