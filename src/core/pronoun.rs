/// Personal pronoun table: selection by number, position and person.

use crate::schema::features::{DiscourseFunction, Features, Gender, NumberAgreement, Person};

/// Grammatical position of a personal pronoun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PronounPosition {
    Subjective,
    Objective,
    Reflexive,
    PossessiveDeterminer,
    PossessivePronoun,
}

impl PronounPosition {
    fn index(self) -> usize {
        match self {
            Self::Subjective => 0,
            Self::Objective => 1,
            Self::Reflexive => 2,
            Self::PossessiveDeterminer => 3,
            Self::PossessivePronoun => 4,
        }
    }

    /// Position for a pronoun carrying `features`.
    pub fn select(features: &Features) -> Self {
        let function = features.discourse_function;
        if features.reflexive {
            return Self::Reflexive;
        }
        if features.possessive {
            return if function == Some(DiscourseFunction::Specifier) {
                Self::PossessiveDeterminer
            } else {
                Self::PossessivePronoun
            };
        }
        let passive = features.passive;
        let subjective = match function {
            Some(DiscourseFunction::Subject) => !passive,
            Some(DiscourseFunction::Object) | Some(DiscourseFunction::Complement) => passive,
            Some(DiscourseFunction::Specifier) => true,
            // An unplaced pronoun is cited in its dictionary form.
            None => true,
            _ => false,
        };
        if subjective {
            Self::Subjective
        } else {
            Self::Objective
        }
    }
}

/// [number][position][person]; person columns are first, second, third
/// masculine, third feminine, third neuter.
const PRONOUNS: [[[&str; 5]; 5]; 2] = [
    [
        ["I", "you", "he", "she", "it"],
        ["me", "you", "him", "her", "it"],
        ["myself", "yourself", "himself", "herself", "itself"],
        ["my", "your", "his", "her", "its"],
        ["mine", "yours", "his", "hers", "its"],
    ],
    [
        ["we", "you", "they", "they", "they"],
        ["us", "you", "them", "them", "them"],
        ["ourselves", "yourselves", "themselves", "themselves", "themselves"],
        ["our", "your", "their", "their", "their"],
        ["ours", "yours", "theirs", "theirs", "theirs"],
    ],
];

fn person_index(person: Person, gender: Gender) -> usize {
    match (person, gender) {
        (Person::First, _) => 0,
        (Person::Second, _) => 1,
        (Person::Third, Gender::Masculine) => 2,
        (Person::Third, Gender::Feminine) => 3,
        (Person::Third, Gender::Neuter) => 4,
    }
}

fn person_at(index: usize) -> (Person, Gender) {
    match index {
        0 => (Person::First, Gender::Neuter),
        1 => (Person::Second, Gender::Neuter),
        2 => (Person::Third, Gender::Masculine),
        3 => (Person::Third, Gender::Feminine),
        _ => (Person::Third, Gender::Neuter),
    }
}

/// Look up a pronoun form.
pub fn pronoun(
    number: NumberAgreement,
    position: PronounPosition,
    person: Person,
    gender: Gender,
) -> &'static str {
    let n = usize::from(number.is_plural());
    PRONOUNS[n][position.index()][person_index(person, gender)]
}

/// Agreement features of a personal pronoun form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PronounIdentity {
    pub number: NumberAgreement,
    pub person: Person,
    pub gender: Gender,
    pub position: PronounPosition,
}

/// Identify `form` as a personal pronoun. Ambiguous forms ("you", "her")
/// resolve to the first cell that holds them, singular before plural.
pub fn identify(form: &str) -> Option<PronounIdentity> {
    let positions = [
        PronounPosition::Subjective,
        PronounPosition::Objective,
        PronounPosition::Reflexive,
        PronounPosition::PossessiveDeterminer,
        PronounPosition::PossessivePronoun,
    ];
    for (n, table) in PRONOUNS.iter().enumerate() {
        for (p, row) in table.iter().enumerate() {
            if let Some(i) = row.iter().position(|cell| cell.eq_ignore_ascii_case(form)) {
                let (person, gender) = person_at(i);
                return Some(PronounIdentity {
                    number: if n == 0 {
                        NumberAgreement::Singular
                    } else {
                        NumberAgreement::Plural
                    },
                    person,
                    gender,
                    position: positions[p],
                });
            }
        }
    }
    None
}

/// Re-select a pronoun for the position its features call for. Forms
/// outside the personal table ("someone", "this") come back unchanged.
pub fn reselect(form: &str, features: &Features) -> String {
    let Some(identity) = identify(form) else {
        return form.to_string();
    };
    let number = features.number.unwrap_or(identity.number);
    let person = features.person.unwrap_or(identity.person);
    let gender = if person == Person::Third {
        features.gender.unwrap_or(identity.gender)
    } else {
        identity.gender
    };
    // Reflexive and possessive forms keep their position unless the
    // features ask for another marked one.
    let position = match identity.position {
        PronounPosition::Subjective | PronounPosition::Objective => {
            PronounPosition::select(features)
        }
        fixed if !features.reflexive && !features.possessive => fixed,
        _ => PronounPosition::select(features),
    };
    pronoun(number, position, person, gender).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_function(function: DiscourseFunction) -> Features {
        Features {
            discourse_function: Some(function),
            ..Features::default()
        }
    }

    #[test]
    fn table_lookup() {
        assert_eq!(
            pronoun(
                NumberAgreement::Singular,
                PronounPosition::Objective,
                Person::Third,
                Gender::Feminine
            ),
            "her"
        );
        assert_eq!(
            pronoun(
                NumberAgreement::Plural,
                PronounPosition::PossessivePronoun,
                Person::First,
                Gender::Neuter
            ),
            "ours"
        );
    }

    #[test]
    fn position_from_function_and_voice() {
        let mut f = with_function(DiscourseFunction::Subject);
        assert_eq!(PronounPosition::select(&f), PronounPosition::Subjective);
        f.passive = true;
        assert_eq!(PronounPosition::select(&f), PronounPosition::Objective);

        let mut f = with_function(DiscourseFunction::Object);
        assert_eq!(PronounPosition::select(&f), PronounPosition::Objective);
        f.passive = true;
        assert_eq!(PronounPosition::select(&f), PronounPosition::Subjective);

        let mut f = with_function(DiscourseFunction::Specifier);
        assert_eq!(PronounPosition::select(&f), PronounPosition::Subjective);
        f.possessive = true;
        assert_eq!(PronounPosition::select(&f), PronounPosition::PossessiveDeterminer);

        let f = with_function(DiscourseFunction::ObjectOfPreposition);
        assert_eq!(PronounPosition::select(&f), PronounPosition::Objective);
    }

    #[test]
    fn identify_and_reselect() {
        let id = identify("They").unwrap();
        assert_eq!(id.number, NumberAgreement::Plural);
        assert_eq!(id.person, Person::Third);

        assert_eq!(reselect("he", &with_function(DiscourseFunction::Object)), "him");
        assert_eq!(reselect("I", &with_function(DiscourseFunction::Object)), "me");
        assert_eq!(reselect("them", &with_function(DiscourseFunction::Subject)), "they");
        assert_eq!(reselect("someone", &with_function(DiscourseFunction::Object)), "someone");
    }

    #[test]
    fn reflexive_wins_over_function() {
        let f = Features {
            reflexive: true,
            discourse_function: Some(DiscourseFunction::Object),
            ..Features::default()
        };
        assert_eq!(reselect("she", &f), "herself");
    }

    #[test]
    fn marked_forms_keep_their_position() {
        assert_eq!(reselect("my", &with_function(DiscourseFunction::Specifier)), "my");
        assert_eq!(reselect("themselves", &with_function(DiscourseFunction::Object)), "themselves");
    }
}
