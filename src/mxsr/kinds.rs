//! MusicXML element kinds
//!
//! One variant per element the skeleton populator reacts to. Everything
//! else maps to `ElementKind::Other` and is browsed but ignored.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    // score header
    ScorePartwise,
    ScoreTimewise,
    Work,
    WorkTitle,
    MovementTitle,
    Identification,
    Creator,
    PartList,
    ScorePart,
    PartName,
    PartAbbreviation,

    // parts and measures
    Part,
    Measure,
    Print,
    Barline,
    Backup,
    Forward,

    // attributes
    Attributes,
    Divisions,
    Key,
    Time,
    Clef,
    Staves,
    MeasureStyle,
    MultipleRest,
    MeasureRepeat,
    BeatRepeat,

    // notes
    Note,
    Pitch,
    Unpitched,
    Rest,
    TimeModification,
    Beam,
    Stem,
    Accidental,
    Lyric,

    // notations
    Notations,
    Tuplet,
    Tied,
    Slur,
    Glissando,
    Slide,
    Articulations,
    Technical,
    Ornaments,
    Fermata,
    Arpeggiate,
    NonArpeggiate,

    // directions
    Direction,
    DirectionType,
    Dynamics,
    Words,
    Wedge,
    Segno,
    Coda,
    Rehearsal,
    OctaveShift,
    Scordatura,
    Eyeglasses,
    Damp,
    DampAll,
    Metronome,
    Bracket,
    Pedal,
    AccordionRegistration,
    HarpPedals,
    OtherDirection,
    Sound,

    // harmonies and figured basses
    Harmony,
    FiguredBass,

    Other,
}

static TAGS: Lazy<HashMap<&'static str, ElementKind>> = Lazy::new(|| {
    use ElementKind::*;
    HashMap::from([
        ("score-partwise", ScorePartwise),
        ("score-timewise", ScoreTimewise),
        ("work", Work),
        ("work-title", WorkTitle),
        ("movement-title", MovementTitle),
        ("identification", Identification),
        ("creator", Creator),
        ("part-list", PartList),
        ("score-part", ScorePart),
        ("part-name", PartName),
        ("part-abbreviation", PartAbbreviation),
        ("part", Part),
        ("measure", Measure),
        ("print", Print),
        ("barline", Barline),
        ("backup", Backup),
        ("forward", Forward),
        ("attributes", Attributes),
        ("divisions", Divisions),
        ("key", Key),
        ("time", Time),
        ("clef", Clef),
        ("staves", Staves),
        ("measure-style", MeasureStyle),
        ("multiple-rest", MultipleRest),
        ("measure-repeat", MeasureRepeat),
        ("beat-repeat", BeatRepeat),
        ("note", Note),
        ("pitch", Pitch),
        ("unpitched", Unpitched),
        ("rest", Rest),
        ("time-modification", TimeModification),
        ("beam", Beam),
        ("stem", Stem),
        ("accidental", Accidental),
        ("lyric", Lyric),
        ("notations", Notations),
        ("tuplet", Tuplet),
        ("tied", Tied),
        ("slur", Slur),
        ("glissando", Glissando),
        ("slide", Slide),
        ("articulations", Articulations),
        ("technical", Technical),
        ("ornaments", Ornaments),
        ("fermata", Fermata),
        ("arpeggiate", Arpeggiate),
        ("non-arpeggiate", NonArpeggiate),
        ("direction", Direction),
        ("direction-type", DirectionType),
        ("dynamics", Dynamics),
        ("words", Words),
        ("wedge", Wedge),
        ("segno", Segno),
        ("coda", Coda),
        ("rehearsal", Rehearsal),
        ("octave-shift", OctaveShift),
        ("scordatura", Scordatura),
        ("eyeglasses", Eyeglasses),
        ("damp", Damp),
        ("damp-all", DampAll),
        ("metronome", Metronome),
        ("bracket", Bracket),
        ("pedal", Pedal),
        ("accordion-registration", AccordionRegistration),
        ("harp-pedals", HarpPedals),
        ("other-direction", OtherDirection),
        ("sound", Sound),
        ("harmony", Harmony),
        ("figured-bass", FiguredBass),
    ])
});

impl ElementKind {
    pub fn from_tag(tag: &str) -> ElementKind {
        TAGS.get(tag).copied().unwrap_or(ElementKind::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(ElementKind::from_tag("note"), ElementKind::Note);
        assert_eq!(ElementKind::from_tag("damp-all"), ElementKind::DampAll);
        assert_eq!(ElementKind::from_tag("time-modification"), ElementKind::TimeModification);
    }

    #[test]
    fn test_unknown_tag_is_other() {
        assert_eq!(ElementKind::from_tag("notehead"), ElementKind::Other);
        assert_eq!(ElementKind::from_tag(""), ElementKind::Other);
    }
}
