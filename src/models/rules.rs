use crate::models::{Language, RecordType};
use lazy_static::lazy_static;

/// A label synonym and the language it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub phrase: &'static str,
    pub language: Language,
}

/// Ordered anchor list for one field. Earlier anchors win.
#[derive(Debug, Clone)]
pub struct FieldAnchors {
    pub field: &'static str,
    pub anchors: Vec<Anchor>,
}

/// Anchors for one record type. `auto` is the per-field union of `en`
/// followed by `ru`, built once when the dictionary is constructed.
#[derive(Debug, Clone)]
pub struct RecordAnchors {
    pub en: Vec<FieldAnchors>,
    pub ru: Vec<FieldAnchors>,
    pub auto: Vec<FieldAnchors>,
}

type AnchorTable = &'static [(&'static str, &'static [&'static str])];

impl RecordAnchors {
    fn build(en: AnchorTable, ru: AnchorTable) -> Self {
        let en = Self::from_table(en, Language::En);
        let ru = Self::from_table(ru, Language::Ru);

        let mut auto: Vec<FieldAnchors> = en.clone();
        for entry in &ru {
            match auto.iter_mut().find(|existing| existing.field == entry.field) {
                Some(existing) => existing.anchors.extend(entry.anchors.iter().copied()),
                None => auto.push(entry.clone()),
            }
        }

        RecordAnchors { en, ru, auto }
    }

    fn from_table(table: AnchorTable, language: Language) -> Vec<FieldAnchors> {
        table
            .iter()
            .map(|&(field, phrases)| FieldAnchors {
                field,
                anchors: phrases
                    .iter()
                    .map(|&phrase| Anchor { phrase, language })
                    .collect(),
            })
            .collect()
    }

    pub fn for_language(&self, language: Language) -> &[FieldAnchors] {
        match language {
            Language::En => &self.en,
            Language::Ru => &self.ru,
            Language::Auto => &self.auto,
        }
    }
}

/// Read-only anchor table for every record type.
#[derive(Debug, Clone)]
pub struct AnchorDictionary {
    baptism: RecordAnchors,
    marriage: RecordAnchors,
    funeral: RecordAnchors,
}

impl AnchorDictionary {
    fn build() -> Self {
        AnchorDictionary {
            baptism: RecordAnchors::build(BAPTISM_EN, BAPTISM_RU),
            marriage: RecordAnchors::build(MARRIAGE_EN, MARRIAGE_RU),
            funeral: RecordAnchors::build(FUNERAL_EN, FUNERAL_RU),
        }
    }

    pub fn get(&self, record_type: RecordType) -> &RecordAnchors {
        match record_type {
            RecordType::Baptism => &self.baptism,
            RecordType::Marriage => &self.marriage,
            RecordType::Funeral => &self.funeral,
        }
    }
}

lazy_static! {
    pub static ref ANCHOR_DICTIONARY: AnchorDictionary = AnchorDictionary::build();
}

const BAPTISM_EN: AnchorTable = &[
    ("child_name", &["child", "name of child", "child name", "name", "infant", "baby"]),
    ("birth_date", &["birth date", "born", "date of birth", "dob", "b.", "born on"]),
    ("reception_date", &["reception date", "received", "date of reception", "reception"]),
    ("baptism_date", &["baptism date", "baptized", "date of baptism", "baptism", "baptized on"]),
    ("birthplace", &["birthplace", "place of birth", "born at", "location"]),
    ("entry_type", &["entry type", "type", "sacrament"]),
    ("sponsors", &["sponsors", "godparents", "god parents", "godfather", "godmother"]),
    ("parents", &["parents", "father and mother", "mother and father"]),
    ("father_name", &["father", "father name", "father's name", "dad"]),
    ("mother_name", &["mother", "mother name", "mother's name", "mom"]),
    ("clergy", &["clergy", "priest", "officiating", "performed by", "by", "father", "fr."]),
];

const BAPTISM_RU: AnchorTable = &[
    ("child_name", &["ребенок", "имя ребенка", "дитя", "младенец", "имя"]),
    ("birth_date", &["дата рождения", "родился", "рождён", "родилась", "рождена", "р."]),
    ("reception_date", &["дата принятия", "принят", "принята", "принятие"]),
    ("baptism_date", &["дата крещения", "крещен", "крещена", "крещение", "крещён"]),
    ("birthplace", &["место рождения", "родился в", "родилась в"]),
    ("entry_type", &["тип записи", "таинство"]),
    ("sponsors", &["восприемники", "крестные", "крестный", "крестная", "восприемник"]),
    ("parents", &["родители", "отец и мать", "мать и отец"]),
    ("father_name", &["отец", "имя отца", "отца"]),
    ("mother_name", &["мать", "имя матери", "матери"]),
    ("clergy", &["священник", "клир", "совершил", "совершила", "иерей"]),
];

const MARRIAGE_EN: AnchorTable = &[
    ("groom_name", &["groom", "groom name", "bridegroom"]),
    ("bride_name", &["bride", "bride name"]),
    ("marriage_date", &["marriage date", "married", "date of marriage", "wedding date"]),
    ("witnesses", &["witnesses", "witness"]),
    ("clergy", &["clergy", "priest", "officiating", "performed by"]),
];

const MARRIAGE_RU: AnchorTable = &[
    ("groom_name", &["жених", "имя жениха"]),
    ("bride_name", &["невеста", "имя невесты"]),
    ("marriage_date", &["дата брака", "брак", "венчание", "дата венчания"]),
    ("witnesses", &["свидетели", "свидетель"]),
    ("clergy", &["священник", "клир", "совершил"]),
];

const FUNERAL_EN: AnchorTable = &[
    ("deceased_name", &["deceased", "name", "deceased name"]),
    ("death_date", &["death date", "died", "date of death", "deceased on"]),
    ("funeral_date", &["funeral date", "funeral", "burial date"]),
    ("burial_location", &["burial location", "buried at", "cemetery"]),
    ("clergy", &["clergy", "priest", "officiating"]),
];

const FUNERAL_RU: AnchorTable = &[
    ("deceased_name", &["умерший", "имя", "имя умершего"]),
    ("death_date", &["дата смерти", "умер", "умерла", "скончался", "скончалась"]),
    ("funeral_date", &["дата похорон", "похороны", "погребение"]),
    ("burial_location", &["место погребения", "кладбище"]),
    ("clergy", &["священник", "клир", "совершил"]),
];

/// How an extracted raw value becomes one or more canonical form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingTarget {
    /// Label-stripped copy. Overwrites anything already mapped to the key.
    Direct(&'static str),
    /// Parsed to `YYYY-MM-DD`. Only fills the key if nothing has yet.
    Date(&'static str),
    /// Split into a father/mother pair.
    Parents {
        father: &'static str,
        mother: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRule {
    pub extracted_key: &'static str,
    pub target: MappingTarget,
}

const fn rule(extracted_key: &'static str, target: MappingTarget) -> MappingRule {
    MappingRule {
        extracted_key,
        target,
    }
}

// Rule order matters: reception date is tried before baptism date, and the
// individual father/mother anchors come after the combined parents split.
const BAPTISM_RULES: &[MappingRule] = &[
    rule("child_name_raw", MappingTarget::Direct("child_name")),
    rule("birth_date_raw", MappingTarget::Date("date_of_birth")),
    rule("reception_date_raw", MappingTarget::Date("date_of_baptism")),
    rule("baptism_date_raw", MappingTarget::Date("date_of_baptism")),
    rule(
        "parents_raw",
        MappingTarget::Parents {
            father: "father_name",
            mother: "mother_name",
        },
    ),
    rule("father_name_raw", MappingTarget::Direct("father_name")),
    rule("mother_name_raw", MappingTarget::Direct("mother_name")),
    rule("birthplace_raw", MappingTarget::Direct("place_of_birth")),
    rule("sponsors_raw", MappingTarget::Direct("godparents")),
    rule("clergy_raw", MappingTarget::Direct("performed_by")),
];

const MARRIAGE_RULES: &[MappingRule] = &[
    rule("groom_name_raw", MappingTarget::Direct("groom_name")),
    rule("bride_name_raw", MappingTarget::Direct("bride_name")),
    rule("marriage_date_raw", MappingTarget::Date("marriage_date")),
    rule("witnesses_raw", MappingTarget::Direct("witnesses")),
    rule("clergy_raw", MappingTarget::Direct("clergy")),
];

const FUNERAL_RULES: &[MappingRule] = &[
    rule("deceased_name_raw", MappingTarget::Direct("deceased_name")),
    rule("death_date_raw", MappingTarget::Date("death_date")),
    rule("funeral_date_raw", MappingTarget::Date("funeral_date")),
    rule("burial_location_raw", MappingTarget::Direct("burial_location")),
    rule("clergy_raw", MappingTarget::Direct("clergy")),
];

pub fn mapping_rules(record_type: RecordType) -> &'static [MappingRule] {
    match record_type {
        RecordType::Baptism => BAPTISM_RULES,
        RecordType::Marriage => MARRIAGE_RULES,
        RecordType::Funeral => FUNERAL_RULES,
    }
}

/// Canonical keys the mapper can populate for a record type, in rule order.
pub fn canonical_fields(record_type: RecordType) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = Vec::new();
    let mut push = |key: &'static str| {
        if !fields.contains(&key) {
            fields.push(key);
        }
    };
    for mapping_rule in mapping_rules(record_type) {
        match mapping_rule.target {
            MappingTarget::Direct(key) | MappingTarget::Date(key) => push(key),
            MappingTarget::Parents { father, mother } => {
                push(father);
                push(mother);
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_dictionary_is_english_then_russian() {
        let baptism = ANCHOR_DICTIONARY.get(RecordType::Baptism);
        let child = baptism
            .auto
            .iter()
            .find(|entry| entry.field == "child_name")
            .unwrap();

        assert_eq!(child.anchors.first().unwrap().phrase, "child");
        assert_eq!(child.anchors.first().unwrap().language, Language::En);
        assert_eq!(child.anchors.last().unwrap().phrase, "имя");
        assert_eq!(child.anchors.last().unwrap().language, Language::Ru);
        assert_eq!(child.anchors.len(), 11);
    }

    #[test]
    fn dictionaries_keep_declared_field_order() {
        let fields: Vec<&str> = ANCHOR_DICTIONARY
            .get(RecordType::Funeral)
            .for_language(Language::Ru)
            .iter()
            .map(|entry| entry.field)
            .collect();
        assert_eq!(
            fields,
            vec!["deceased_name", "death_date", "funeral_date", "burial_location", "clergy"]
        );
    }

    #[test]
    fn every_record_type_has_anchors_and_rules() {
        for record_type in RecordType::ALL {
            let anchors = ANCHOR_DICTIONARY.get(record_type);
            assert!(!anchors.en.is_empty());
            assert!(!anchors.ru.is_empty());
            assert_eq!(anchors.auto.len(), anchors.en.len());
            assert!(!mapping_rules(record_type).is_empty());
            assert!(!canonical_fields(record_type).is_empty());
        }
    }

    #[test]
    fn canonical_fields_expand_parents_pair() {
        let fields = canonical_fields(RecordType::Baptism);
        assert_eq!(
            fields,
            vec![
                "child_name",
                "date_of_birth",
                "date_of_baptism",
                "father_name",
                "mother_name",
                "place_of_birth",
                "godparents",
                "performed_by",
            ]
        );
    }
}
