use botw_lib::byml::{Byml, Hash};
use botw_lib::Endian;

fn sample_tree() -> Byml {
    let mut hash = Hash::default();
    hash.insert("Actor".to_string(), Byml::String("Enemy_Lynel".to_string()));
    hash.insert("IsHard".to_string(), Byml::Bool(true));
    hash.insert("Level".to_string(), Byml::Int(90));
    hash.insert("HashId".to_string(), Byml::UInt(0xDEAD_BEEF));
    hash.insert("UnitId".to_string(), Byml::UInt64(1u64 << 63));
    hash.insert("Offset".to_string(), Byml::Int64(-1));
    hash.insert("Scale".to_string(), Byml::Float(0.5));
    hash.insert("Rate".to_string(), Byml::Double(0.25));
    hash.insert(
        "Translate".to_string(),
        Byml::Array(vec![
            Byml::Float(1.0),
            Byml::Float(-2.5),
            Byml::Float(3.75),
        ]),
    );
    hash.insert("Extra".to_string(), Byml::Null);
    Byml::Hash(hash)
}

#[test]
fn text_round_trip_preserves_variants() {
    let doc = sample_tree();
    let text = doc.to_text().unwrap();
    assert_eq!(Byml::from_text(&text).unwrap(), doc);
}

#[test]
fn text_matches_expected_layout() {
    let mut hash = Hash::default();
    hash.insert("Name".to_string(), Byml::String("Bokoblin".to_string()));
    hash.insert("Hp".to_string(), Byml::Int(13));
    hash.insert("Tags".to_string(), Byml::Array(vec![Byml::String("Enemy".to_string())]));
    let text = Byml::Hash(hash).to_text().unwrap();
    assert_eq!(text, "Name: Bokoblin\nHp: 13\nTags:\n  - Enemy\n");
}

#[test]
fn text_survives_binary_round_trip() {
    let doc = sample_tree();
    let binary = doc.to_binary(Endian::Big, 2).unwrap();
    let parsed = Byml::from_binary(&binary).unwrap();
    let text = parsed.to_text().unwrap();
    assert_eq!(Byml::from_text(&text).unwrap(), parsed);
}

#[test]
fn keys_needing_quotes_round_trip() {
    let mut hash = Hash::default();
    hash.insert("0500".to_string(), Byml::Int(1));
    hash.insert("true".to_string(), Byml::Int(2));
    hash.insert("with: colon".to_string(), Byml::Int(3));
    let doc = Byml::Hash(hash);
    let text = doc.to_text().unwrap();
    assert_eq!(Byml::from_text(&text).unwrap(), doc);
}
