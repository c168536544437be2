use botw_lib::aamp::names::NameTable;
use botw_lib::aamp::{Name, Parameter, ParameterIO, ParameterList, ParameterObject, Vector3f};

#[test]
fn vec3_text_round_trip() {
    let text = "!io\nversion: 0\ntype: xlink\nparam_root: !list\n  objects:\n    TestObj: !obj\n      Position: !vec3 [1.0, 2.0, 3.0]\n  lists: {}\n";
    let pio = ParameterIO::from_text(text).unwrap();
    assert_eq!(pio.version, 0);
    assert_eq!(pio.io_type, "xlink");
    let object = pio.param_root.object("TestObj").unwrap();
    assert_eq!(
        object.get("Position"),
        Some(&Parameter::Vec3(Vector3f {
            x: 1.0,
            y: 2.0,
            z: 3.0
        }))
    );

    let mut table = NameTable::new(false);
    table.add_name_reference("TestObj");
    table.add_name_reference("Position");
    assert_eq!(pio.to_text_with_table(&mut table).unwrap(), text);
}

fn curve_document(count: usize) -> String {
    let zeros = vec!["0"; count].join(", ");
    format!(
        "!io\nversion: 0\ntype: xml\nparam_root: !list\n  objects:\n    Obj: !obj\n      Ease: !curve [{zeros}]\n  lists: {{}}\n"
    )
}

#[test]
fn curve_length_selects_the_variant() {
    let pio = ParameterIO::from_text(&curve_document(64)).unwrap();
    let object = pio.param_root.object("Obj").unwrap();
    assert!(matches!(object.get("Ease"), Some(Parameter::Curve2(_))));

    let pio = ParameterIO::from_text(&curve_document(96)).unwrap();
    let object = pio.param_root.object("Obj").unwrap();
    assert!(matches!(object.get("Ease"), Some(Parameter::Curve3(_))));

    assert!(ParameterIO::from_text(&curve_document(48)).is_err());
    assert!(ParameterIO::from_text(&curve_document(160)).is_err());
}

#[test]
fn u32_variant_survives_round_trip() {
    let mut pio = ParameterIO::new("xml");
    let mut object = ParameterObject::default();
    object.insert("HashValue", Parameter::U32(4_294_967_295));
    pio.param_root.objects.insert(Name::from("Obj"), object);

    let mut table = NameTable::new(false);
    table.add_name_reference("Obj");
    table.add_name_reference("HashValue");
    let text = pio.to_text_with_table(&mut table).unwrap();
    assert!(text.contains("HashValue: !u 4294967295"), "{text}");

    let parsed = ParameterIO::from_text(&text).unwrap();
    assert_eq!(
        parsed.param_root.object("Obj").unwrap().get("HashValue"),
        Some(&Parameter::U32(u32::MAX))
    );
    assert_eq!(parsed, pio);
}

#[test]
fn names_are_recovered_from_the_parent() {
    let mut enemies = ParameterList::default();
    let mut dummy = ParameterObject::default();
    dummy.insert("IsOn", Parameter::Bool(true));
    enemies.objects.insert(Name::from("Enemy_0"), dummy.clone());
    enemies.objects.insert(Name::from("Enemy_1"), dummy);

    let mut pio = ParameterIO::new("xml");
    pio.param_root.lists.insert(Name::from("EnemyList"), enemies);

    let mut table = NameTable::new(false);
    table.add_name_reference("EnemyList");
    table.add_name_reference("IsOn");
    let text = pio.to_text_with_table(&mut table).unwrap();
    // Enemy_0 and Enemy_1 are not in the table; they are guessed by
    // stripping the "List" suffix from the parent name.
    assert!(text.contains("Enemy_0: !obj"), "{text}");
    assert!(text.contains("Enemy_1: !obj"), "{text}");

    assert_eq!(ParameterIO::from_text(&text).unwrap(), pio);
}

#[test]
fn unresolved_names_fall_back_to_integer_hashes() {
    let mut pio = ParameterIO::new("xml");
    let mut object = ParameterObject::default();
    object.insert(Name(0xDEAD_BEEF), Parameter::Int(1));
    pio.param_root.objects.insert(Name(0xCAFE_F00D), object);

    let mut table = NameTable::new(false);
    let text = pio.to_text_with_table(&mut table).unwrap();
    assert!(text.contains("3405705229"), "{text}");
    assert_eq!(ParameterIO::from_text(&text).unwrap(), pio);
}

#[test]
fn string_values_resolve_hashed_keys() {
    // A key whose name appears as a string value elsewhere in the same
    // document is recovered without any seeded table.
    let mut pio = ParameterIO::new("xml");
    let mut definitions = ParameterObject::default();
    definitions.insert("DemoName", Parameter::StringRef("TipsSetting".to_string()));
    let mut tips = ParameterObject::default();
    tips.insert("Enabled", Parameter::Bool(true));
    pio.param_root
        .objects
        .insert(Name::from("Definitions"), definitions);
    pio.param_root
        .objects
        .insert(Name::from("TipsSetting"), tips);

    let mut table = NameTable::new(false);
    table.add_name_reference("Definitions");
    table.add_name_reference("DemoName");
    table.add_name_reference("Enabled");
    let text = pio.to_text_with_table(&mut table).unwrap();
    assert!(text.contains("TipsSetting: !obj"), "{text}");
}

#[test]
fn binary_and_text_agree() {
    let text = "!io\nversion: 10\ntype: botw_test\nparam_root: !list\n  objects:\n    TestContent: !obj\n      Bool_0: true\n      F32_0: 500.12\n      Int_0: 270\n      Str32_0: !str32 Hello\n      Vec3_0: !vec3 [1.0, 2.0, 3.0]\n  lists: {}\n";
    let pio = ParameterIO::from_text(text).unwrap();
    let binary = pio.to_binary().unwrap();
    assert_eq!(ParameterIO::from_binary(&binary).unwrap(), pio);
}
