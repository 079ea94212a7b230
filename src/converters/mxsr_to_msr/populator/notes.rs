//! Notes and their notations
//!
//! A note is started from its `<note>` element's leaf children, collects
//! notations while its subtree is browsed, and is finalized at `visit_end`.
//! Finalization decides where the note goes:
//!
//! - grace notes join the voice's pending grace notes group (or the
//!   previous note's after-group with `steal-time-previous`);
//! - `<chord/>` notes join the chord anchored on the voice's last note;
//! - anything else opens tuplets, is appended to the innermost open tuplet,
//!   the open double tremolo or the voice measure, then closes tuplets.

use super::context::{GraceInfo, LyricInfo, NoteBuilder, TremoloMarker, TupletMarker};
use super::SkeletonPopulator;
use crate::converters::mxsr_to_msr::errors::ConversionError;
use crate::diagnostics::DiagnosticKind;
use crate::msr::annotations::{
    Articulation, Beam, Fermata, Glide, Ornament, Slur, Syllable, SyllableKind, Technical, Tie,
};
use crate::msr::{
    Alteration, DoubleTremolo, ElementLocation, GraceMember, GraceNotesGroup, GraceNotesGroupKind, Note,
    NoteId, NoteKind, NoteType, Pitch, Placement, StartStop, Step, Tuplet, TupletFactor,
    WholeNotes, MAX_DOTS,
};
use crate::mxsr::{ElementKind, MxsrElement};
use std::cmp::Reverse;

/// Strokes assumed for a `<tremolo>` without a mark count
const DEFAULT_TREMOLO_MARKS: u32 = 3;
const MAX_TREMOLO_MARKS: i32 = 8;

/// Pitch, rest, unpitched or skip, from the note's children
fn note_kind(element: &MxsrElement) -> NoteKind {
    if let Some(pitch) = element.child("pitch") {
        let step = pitch.child_text("step").and_then(Step::parse);
        let alteration = pitch
            .child_f64("alter")
            .and_then(Alteration::from_alter)
            .unwrap_or_default();
        return match step {
            Some(step) => NoteKind::Pitched(Pitch::new(
                step,
                alteration,
                pitch.child_i32("octave").unwrap_or(4),
            )),
            None => NoteKind::Unpitched {
                display_step: None,
                display_octave: None,
            },
        };
    }
    if let Some(rest) = element.child("rest") {
        if element.attribute("print-object") == Some("no") {
            return NoteKind::Skip;
        }
        return NoteKind::Rest {
            measure_rest: rest.attribute_is_yes("measure"),
            display_step: rest.child_text("display-step").and_then(Step::parse),
            display_octave: rest.child_i32("display-octave"),
        };
    }
    if let Some(unpitched) = element.child("unpitched") {
        return NoteKind::Unpitched {
            display_step: unpitched.child_text("display-step").and_then(Step::parse),
            display_octave: unpitched.child_i32("display-octave"),
        };
    }
    NoteKind::Skip
}

fn tuplet_marker(element: &MxsrElement) -> TupletMarker {
    let actual = element
        .child("tuplet-actual")
        .and_then(|a| a.child_i32("tuplet-number"));
    let normal = element
        .child("tuplet-normal")
        .and_then(|n| n.child_i32("tuplet-number"));
    TupletMarker {
        number: element.attribute_i32("number"),
        explicit_factor: actual
            .zip(normal)
            .and_then(|(a, n)| TupletFactor::new(a, n)),
        bracket: element.attribute("bracket").map(|b| b == "yes"),
        show_number: element.attribute("show-number").map(str::to_string),
        placement: Placement::parse(element.attribute("placement")),
        input_line: element.input_line,
    }
}

impl SkeletonPopulator {
    pub(super) fn start_note(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let grace = element.child("grace").map(|g| GraceInfo {
            slashed: g.attribute_is_yes("slash"),
            steal_time_previous: g.attribute("steal-time-previous").is_some(),
        });
        let time_modification = element.child("time-modification").and_then(|tm| {
            TupletFactor::new(tm.child_i32("actual-notes")?, tm.child_i32("normal-notes")?)
        });
        let note_type = element.child_text("type").and_then(NoteType::from_musicxml);
        let mut dots = element.children_named("dot").count() as u32;
        if dots > MAX_DOTS {
            self.diagnostics.warning(
                element.input_line,
                DiagnosticKind::ExcessiveDots,
                format!("{} dots on a note, only {} honoured", dots, MAX_DOTS),
            );
            dots = MAX_DOTS;
        }
        let display = note_type.map(|t| t.dotted_whole_notes(dots));

        let sounding = if grace.is_some() {
            WholeNotes::zero()
        } else {
            match element.child_i32("duration") {
                Some(duration) => self.ctx.whole_notes(duration),
                None => display
                    .map(|d| time_modification.map_or(d, |tm| d.under_tuplet(tm)))
                    .unwrap_or_default(),
            }
        };

        let mut note = Note::new(note_kind(element), sounding, element.input_line);
        note.display_whole_notes = display.unwrap_or(sounding);
        note.note_type = note_type;
        note.dots = dots;
        note.is_grace = grace.is_some();
        note.is_cue = element.has_child("cue");
        note.tuplet_factor = time_modification;
        note.accidental = element.child_text("accidental").map(str::to_string);
        note.stem = element.child_text("stem").map(str::to_string);
        note.measure_number = self.ctx.measure_number.clone();

        self.ctx.note = Some(NoteBuilder {
            note,
            voice: element.child_i32("voice"),
            staff: element.child_i32("staff"),
            is_chord_member: element.has_child("chord"),
            grace,
            time_modification,
            tuplet_starts: Vec::new(),
            tuplet_stops: Vec::new(),
            tremolo: None,
            lyrics: Vec::new(),
        });
        Ok(())
    }

    pub(super) fn visit_beam(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            builder.note.beams.push(Beam {
                number: element.attribute_i32("number").unwrap_or(1),
                value: element.text().unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn visit_tuplet(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(builder) = self.ctx.note.as_mut() else {
            return Ok(());
        };
        match element.attribute("type") {
            Some("start") => builder.tuplet_starts.push(tuplet_marker(element)),
            Some("stop") => builder.tuplet_stops.push(tuplet_marker(element)),
            _ => {}
        }
        Ok(())
    }

    pub(super) fn visit_tied(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(kind) = StartStop::parse(element.attribute("type")) {
            self.pending.ties.push(Tie {
                kind,
                input_line: element.input_line,
            });
        }
        Ok(())
    }

    pub(super) fn visit_slur(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(kind) = StartStop::parse(element.attribute("type")) {
            self.pending.slurs.push(Slur {
                number: element.attribute_i32("number").unwrap_or(1),
                kind,
                placement: Placement::parse(element.attribute("placement")),
                input_line: element.input_line,
            });
        }
        Ok(())
    }

    /// Glissandos and slides
    pub(super) fn visit_glide(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(kind) = StartStop::parse(element.attribute("type")) else {
            return Ok(());
        };
        let glide = Glide {
            number: element.attribute_i32("number").unwrap_or(1),
            kind,
            line_type: element.attribute("line-type").map(str::to_string),
            text: element.text().map(str::to_string),
            input_line: element.input_line,
        };
        if element.kind == ElementKind::Glissando {
            self.pending.glissandos.push(glide);
        } else {
            self.pending.slides.push(glide);
        }
        Ok(())
    }

    pub(super) fn visit_articulations(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            builder
                .note
                .articulations
                .extend(element.children.iter().map(|a| Articulation {
                    kind: a.name.clone(),
                    placement: Placement::parse(a.attribute("placement")),
                }));
        }
        Ok(())
    }

    pub(super) fn visit_technical(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            builder
                .note
                .technicals
                .extend(element.children.iter().map(|t| Technical {
                    kind: t.name.clone(),
                    text: t.text().map(str::to_string),
                }));
        }
        Ok(())
    }

    /// Ornaments, plus the start and stop of double tremolos
    pub(super) fn visit_ornaments(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(builder) = self.ctx.note.as_mut() else {
            return Ok(());
        };
        for ornament in element.children.iter().filter(|o| o.name != "accidental-mark") {
            let marks = (ornament.name == "tremolo").then(|| {
                ornament
                    .text_i32()
                    .map_or(DEFAULT_TREMOLO_MARKS, |m| m.clamp(0, MAX_TREMOLO_MARKS) as u32)
            });
            match (marks, StartStop::parse(ornament.attribute("type"))) {
                (Some(marks), Some(kind @ (StartStop::Start | StartStop::Stop))) => {
                    builder.tremolo = Some(TremoloMarker {
                        kind,
                        marks,
                        input_line: ornament.input_line,
                    });
                }
                _ => builder.note.ornaments.push(Ornament {
                    kind: ornament.name.clone(),
                    placement: Placement::parse(ornament.attribute("placement")),
                    marks,
                }),
            }
        }
        Ok(())
    }

    pub(super) fn visit_fermata(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            builder.note.fermatas.push(Fermata {
                shape: element.text().map(str::to_string),
                inverted: element.attribute("type") == Some("inverted"),
            });
        }
        Ok(())
    }

    pub(super) fn visit_arpeggiate(&mut self, _element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            builder.note.arpeggiate = true;
        }
        Ok(())
    }

    pub(super) fn visit_lyric(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        if let Some(builder) = self.ctx.note.as_mut() {
            let texts: Vec<&str> = element
                .children_named("text")
                .filter_map(|t| t.text())
                .collect();
            builder.lyrics.push(LyricInfo {
                number: element.attribute("number").unwrap_or("1").to_string(),
                syllabic: element.child_text("syllabic").map(str::to_string),
                text: texts.join("_"),
                extend: element.has_child("extend"),
                input_line: element.input_line,
            });
        }
        Ok(())
    }

    pub(super) fn end_note(&mut self, element: &MxsrElement) -> Result<(), ConversionError> {
        let Some(builder) = self.ctx.note.take() else {
            return Ok(());
        };
        let line = element.input_line;
        let part_index = self.part_index(element)?;
        let voice_number = builder.voice.unwrap_or(1);
        let staff_number = self.resolve_staff(
            part_index,
            voice_number,
            builder.staff,
            builder.is_chord_member,
            line,
        )?;

        let NoteBuilder {
            mut note,
            is_chord_member,
            grace,
            time_modification,
            tuplet_starts,
            tuplet_stops,
            tremolo,
            lyrics,
            ..
        } = builder;
        note.voice_number = voice_number;
        note.staff_number = staff_number;

        let drained = self.pending.drain_onto_note(&mut note.annotations);
        let sounding = note.sounding_whole_notes;
        let note_id = self.score.arena.add_note(note);

        let part = &mut self.score.parts[part_index];
        let drained_to_measure = match part.current_measure_mut() {
            Some(measure) => self.pending.drain_onto_measure(measure),
            None => 0,
        };
        if self.trace().pending && drained + drained_to_measure > 0 {
            log::debug!(
                "line {}: {} pending element(s) attached to the note, {} to measure {}",
                line,
                drained,
                drained_to_measure,
                self.ctx.measure_number
            );
        }

        if let Some(grace) = grace {
            self.append_grace_note(
                part_index,
                staff_number,
                voice_number,
                note_id,
                grace,
                is_chord_member,
                line,
            )?;
        } else {
            let joined_chord = is_chord_member
                && self.append_chord_member(
                    part_index,
                    staff_number,
                    voice_number,
                    note_id,
                    tuplet_stops.clone(),
                    !tuplet_starts.is_empty(),
                    line,
                )?;
            if !joined_chord {
                self.append_principal_note(
                    part_index,
                    staff_number,
                    voice_number,
                    note_id,
                    sounding,
                    time_modification,
                    tuplet_starts,
                    tuplet_stops,
                    tremolo,
                    line,
                )?;
            }
        }

        self.attach_lyrics(part_index, staff_number, voice_number, note_id, lyrics);
        Ok(())
    }

    /// Staff the note goes to, appending a staff change to the departing
    /// voice when an explicit `<staff>` moves the voice.
    fn resolve_staff(
        &mut self,
        part_index: usize,
        voice_number: i32,
        explicit: Option<i32>,
        is_chord_member: bool,
        line: u32,
    ) -> Result<i32, ConversionError> {
        let declared = self.score.parts[part_index].declared_staves;
        let explicit = match explicit {
            Some(staff) if staff < 1 || staff > declared => {
                self.diagnostics.warning(
                    line,
                    DiagnosticKind::UndeclaredStaff,
                    format!(
                        "staff {} is not declared (the part has {} staff(s)), ignored",
                        staff, declared
                    ),
                );
                None
            }
            other => other,
        };

        let last = self.ctx.voice_staves.get(&voice_number).copied();
        if is_chord_member {
            if let Some(last) = last {
                return Ok(last);
            }
        }

        let staff = match explicit {
            Some(staff) => {
                if let Some(from) = last.filter(|from| *from != staff) {
                    self.change_staff(part_index, voice_number, from, staff, line)?;
                }
                staff
            }
            None => self.ctx.recipient_staff.or(last).unwrap_or(1),
        };
        self.ctx.voice_staves.insert(voice_number, staff);
        Ok(staff)
    }

    fn change_staff(
        &mut self,
        part_index: usize,
        voice_number: i32,
        from: i32,
        to: i32,
        line: u32,
    ) -> Result<(), ConversionError> {
        let index = self.ctx.measure_index;
        let part = &mut self.score.parts[part_index];

        let departing = part.voice_in_measure(from, voice_number, index);
        departing.append_staff_change(from, to)?;
        let carry_over = departing.nesting_mut().take_carry_over();

        part.voice_in_measure(to, voice_number, index)
            .nesting_mut()
            .adopt_carry_over(carry_over);
        self.ctx.recipient_staff = Some(to);

        if self.trace().staff_changes {
            log::debug!(
                "line {}: voice {} moves from staff {} to staff {}",
                line,
                voice_number,
                from,
                to
            );
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn append_grace_note(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        note_id: NoteId,
        grace: GraceInfo,
        is_chord_member: bool,
        line: u32,
    ) -> Result<(), ConversionError> {
        let index = self.ctx.measure_index;
        let trace = self.settings.trace.grace_notes;
        let arena = &mut self.score.arena;
        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);

        if is_chord_member {
            let anchor = match voice.nesting().last_note() {
                Some(anchor) if arena.note(anchor.note)?.is_grace => Some(anchor),
                _ => None,
            };
            match anchor {
                Some(anchor) => {
                    let chord = voice.promote_to_chord(arena, anchor, line)?;
                    arena.chord_mut(chord)?.notes.push(note_id);
                    voice
                        .nesting_mut()
                        .set_last_note(note_id, ElementLocation::Chord { chord });
                    return Ok(());
                }
                None => self.diagnostics.warning(
                    line,
                    DiagnosticKind::ChordWithoutAnchor,
                    format!(
                        "grace chord note in voice {} has no grace note to anchor to",
                        voice_number
                    ),
                ),
            }
        }

        let stolen_from = voice
            .nesting()
            .last_principal_note()
            .filter(|_| grace.steal_time_previous);
        let group = match stolen_from {
            Some(principal) => match arena.note(principal)?.grace_notes_group_after {
                Some(group) => group,
                None => {
                    let group = arena.add_grace_notes_group(GraceNotesGroup::new(
                        GraceNotesGroupKind::After,
                        grace.slashed,
                        line,
                    ));
                    arena.note_mut(principal)?.grace_notes_group_after = Some(group);
                    group
                }
            },
            None => match voice.nesting().pending_grace_notes() {
                Some(group) => group,
                None => {
                    let group = arena.add_grace_notes_group(GraceNotesGroup::new(
                        GraceNotesGroupKind::Before,
                        grace.slashed,
                        line,
                    ));
                    voice.nesting_mut().set_pending_grace_notes(group);
                    group
                }
            },
        };

        let members = &mut arena.grace_notes_group_mut(group)?.members;
        members.push(GraceMember::Note(note_id));
        let location = ElementLocation::GraceNotesGroup {
            group,
            index: members.len() - 1,
        };
        voice.nesting_mut().set_last_note(note_id, location);

        if trace {
            log::debug!(
                "line {}: grace note joins {} group #{} of voice {}",
                line,
                if stolen_from.is_some() { "after" } else { "before" },
                group.0,
                voice_number
            );
        }
        Ok(())
    }

    /// `false` when there is no anchor and the note must be treated as a
    /// plain note
    #[allow(clippy::too_many_arguments)]
    fn append_chord_member(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        note_id: NoteId,
        mut tuplet_stops: Vec<TupletMarker>,
        has_tuplet_starts: bool,
        line: u32,
    ) -> Result<bool, ConversionError> {
        let index = self.ctx.measure_index;
        let trace = self.settings.trace.chords;
        let arena = &mut self.score.arena;
        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);

        let anchor = match voice.nesting().last_note() {
            Some(anchor) if !arena.note(anchor.note)?.is_grace => anchor,
            _ => {
                self.diagnostics.warning(
                    line,
                    DiagnosticKind::ChordWithoutAnchor,
                    format!(
                        "<chord/> note in voice {} of measure {} has no previous note to anchor to, treated as a plain note",
                        voice_number, self.ctx.measure_number
                    ),
                );
                return Ok(false);
            }
        };

        let chord = voice.promote_to_chord(arena, anchor, line)?;
        arena.chord_mut(chord)?.notes.push(note_id);
        voice
            .nesting_mut()
            .set_last_note(note_id, ElementLocation::Chord { chord });

        if trace {
            log::debug!(
                "line {}: note joins chord #{} ({} notes)",
                line,
                chord.0,
                arena.chord(chord)?.notes.len()
            );
            if has_tuplet_starts {
                log::debug!("line {}: tuplet start on a chord member ignored", line);
            }
        }

        let consumed = voice.nesting().anchor_tuplet_stops();
        if tuplet_stops.len() > consumed {
            let extra = tuplet_stops.len() - consumed;
            voice.nesting_mut().add_anchor_tuplet_stops(extra);
            tuplet_stops.sort_by_key(|m| Reverse(m.number.unwrap_or(0)));
            let beyond_anchor = tuplet_stops.split_off(consumed);
            self.close_tuplets(part_index, staff_number, voice_number, &beyond_anchor, line)?;
        }
        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    fn append_principal_note(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        note_id: NoteId,
        sounding: WholeNotes,
        time_modification: Option<TupletFactor>,
        mut tuplet_starts: Vec<TupletMarker>,
        mut tuplet_stops: Vec<TupletMarker>,
        tremolo: Option<TremoloMarker>,
        line: u32,
    ) -> Result<(), ConversionError> {
        let index = self.ctx.measure_index;
        let cursor = self.ctx.cursor;

        tuplet_starts.sort_by_key(|m| m.number.unwrap_or(0));
        for marker in &tuplet_starts {
            self.open_tuplet(
                part_index,
                staff_number,
                voice_number,
                marker,
                time_modification,
            )?;
        }

        let arena = &mut self.score.arena;
        let part = &mut self.score.parts[part_index];
        let voice = part.voice_in_measure(staff_number, voice_number, index);

        if let Some(group) = voice.nesting_mut().take_pending_grace_notes() {
            arena.note_mut(note_id)?.grace_notes_group_before = Some(group);
        }

        let in_tuplet = voice.nesting().depth() > 0;
        let open_tremolo = voice.nesting().open_double_tremolo();
        let stops_tremolo = match tremolo {
            Some(marker) if in_tuplet => {
                self.diagnostics.unsupported(marker.input_line, "double tremolo inside a tuplet");
                false
            }
            Some(marker) if marker.kind == StartStop::Start => {
                if let Some(previous) = voice.nesting_mut().take_open_double_tremolo() {
                    self.diagnostics.warning(
                        arena.double_tremolo(previous)?.input_line,
                        DiagnosticKind::UnmatchedDoubleTremolo,
                        format!(
                            "double tremolo in voice {} restarted before its second note",
                            voice_number
                        ),
                    );
                }
                let mut double_tremolo = DoubleTremolo::new(marker.marks, marker.input_line);
                double_tremolo.measure_number = self.ctx.measure_number.clone();
                let tremolo_id = arena.add_double_tremolo(double_tremolo);
                voice.open_double_tremolo(tremolo_id, cursor)?;
                false
            }
            Some(marker) => {
                if open_tremolo.is_none() {
                    self.diagnostics.warning(
                        marker.input_line,
                        DiagnosticKind::UnmatchedDoubleTremolo,
                        format!(
                            "double tremolo stop in voice {} without a start, ignored",
                            voice_number
                        ),
                    );
                }
                open_tremolo.is_some()
            }
            None => {
                if let Some(previous) = open_tremolo.filter(|_| !in_tuplet) {
                    voice.nesting_mut().take_open_double_tremolo();
                    self.diagnostics.warning(
                        arena.double_tremolo(previous)?.input_line,
                        DiagnosticKind::UnmatchedDoubleTremolo,
                        format!(
                            "double tremolo in voice {} interrupted before its stop",
                            voice_number
                        ),
                    );
                }
                false
            }
        };

        let owner = voice
            .nesting()
            .tuplet_owner_staff()
            .filter(|owner| *owner != staff_number && voice.nesting().depth() > 0);
        let location = voice.append_note(arena, note_id, cursor, line)?;
        match owner {
            // the tuplet lives in the voice this one moved away from
            Some(owner) => part
                .voice_in_measure(owner, voice_number, index)
                .advance(sounding),
            None => voice.advance(sounding),
        }

        tuplet_stops.sort_by_key(|m| Reverse(m.number.unwrap_or(0)));
        self.close_tuplets(part_index, staff_number, voice_number, &tuplet_stops, line)?;

        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);
        let nesting = voice.nesting_mut();
        if stops_tremolo {
            nesting.take_open_double_tremolo();
        }
        nesting.set_last_note(note_id, location);
        nesting.set_last_principal_note(note_id, tuplet_stops.len());

        self.ctx.advance_cursor(sounding);
        Ok(())
    }

    fn open_tuplet(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        marker: &TupletMarker,
        time_modification: Option<TupletFactor>,
    ) -> Result<(), ConversionError> {
        let index = self.ctx.measure_index;
        let cursor = self.ctx.cursor;
        let arena = &mut self.score.arena;
        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);

        let number = marker
            .number
            .unwrap_or_else(|| voice.nesting().expected_tuplet_number());
        let factor = match (marker.explicit_factor, time_modification) {
            (Some(factor), _) => Some(factor),
            (None, Some(tm)) => Some(tm.divided_by(voice.nesting().enclosing_factor(arena)?)),
            (None, None) => None,
        }
        .filter(|f| !f.is_identity());

        let Some(factor) = factor else {
            self.diagnostics.warning(
                marker.input_line,
                DiagnosticKind::MalformedTuplet,
                format!(
                    "tuplet {} starts on a note without a usable ratio, ignored",
                    number
                ),
            );
            return Ok(());
        };

        let mut tuplet = Tuplet::new(number, factor, marker.input_line);
        tuplet.bracket = marker.bracket;
        tuplet.show_number = marker.show_number.clone();
        tuplet.placement = marker.placement;
        tuplet.measure_number = self.ctx.measure_number.clone();
        let tuplet_id = arena.add_tuplet(tuplet);

        if let Some(drift) = voice.open_tuplet(arena, tuplet_id, number, cursor)? {
            self.diagnostics.warning(
                marker.input_line,
                DiagnosticKind::TupletNumberingDrift,
                format!(
                    "tuplet {} opened in voice {} where tuplet {} was expected",
                    drift.found, voice_number, drift.expected
                ),
            );
        }

        if self.settings.trace.tuplets {
            log::debug!(
                "line {}: tuplet #{} {} opened in voice {} (depth {})",
                marker.input_line,
                number,
                factor,
                voice_number,
                voice.nesting().depth()
            );
        }
        Ok(())
    }

    /// Pop once per stop marker, innermost first
    fn close_tuplets(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        stops: &[TupletMarker],
        line: u32,
    ) -> Result<(), ConversionError> {
        let index = self.ctx.measure_index;
        let trace = self.settings.trace.tuplets;
        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);

        for marker in stops {
            let Some(top) = voice.nesting().innermost_tuplet_number() else {
                self.diagnostics.warning(
                    marker.input_line,
                    DiagnosticKind::TupletStopWithoutStart,
                    format!(
                        "tuplet stop in voice {} without an open tuplet, ignored",
                        voice_number
                    ),
                );
                continue;
            };
            if let Some(number) = marker.number.filter(|n| *n != top) {
                self.diagnostics.warning(
                    marker.input_line,
                    DiagnosticKind::TupletNumberingDrift,
                    format!(
                        "tuplet stop {} in voice {} closes open tuplet {}",
                        number, voice_number, top
                    ),
                );
            }
            let tuplet = voice.close_innermost_tuplet(line)?;
            if trace {
                log::debug!(
                    "line {}: tuplet #{} (arena #{}) closed in voice {}",
                    line,
                    top,
                    tuplet.0,
                    voice_number
                );
            }
        }
        Ok(())
    }

    fn attach_lyrics(
        &mut self,
        part_index: usize,
        staff_number: i32,
        voice_number: i32,
        note_id: NoteId,
        lyrics: Vec<LyricInfo>,
    ) {
        if lyrics.is_empty() {
            return;
        }
        let index = self.ctx.measure_index;
        let measure_number = self.ctx.measure_number.clone();
        let voice = self.score.parts[part_index].voice_in_measure(staff_number, voice_number, index);
        for lyric in lyrics {
            voice.stanza_mut(&lyric.number).syllables.push(Syllable {
                kind: SyllableKind::parse(lyric.syllabic.as_deref()),
                text: lyric.text,
                extend: lyric.extend,
                note: note_id,
                measure_number: measure_number.clone(),
                input_line: lyric.input_line,
            });
        }
    }
}
