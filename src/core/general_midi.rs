use crate::error::{self, LibResult};
use std::convert::TryFrom;

/// The 128 instrument patches defined by the General MIDI 1 sound set. A [`crate::file::Track`]
/// can be assigned one of these via [`crate::file::Track::set_general_midi`], which emits the
/// corresponding [`crate::core::Message::ProgramChange`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum GeneralMidi {
    AcousticGrandPiano = 0,
    BrightAcousticPiano = 1,
    ElectricGrandPiano = 2,
    HonkyTonkPiano = 3,
    ElectricPiano1 = 4,
    ElectricPiano2 = 5,
    Harpsichord = 6,
    Clavi = 7,
    Celesta = 8,
    Glockenspiel = 9,
    MusicBox = 10,
    Vibraphone = 11,
    Marimba = 12,
    Xylophone = 13,
    TubularBells = 14,
    Dulcimer = 15,
    DrawbarOrgan = 16,
    PercussiveOrgan = 17,
    RockOrgan = 18,
    ChurchOrgan = 19,
    ReedOrgan = 20,
    Accordion = 21,
    Harmonica = 22,
    TangoAccordion = 23,
    AcousticGuitarNylon = 24,
    AcousticGuitarSteel = 25,
    ElectricGuitarJazz = 26,
    ElectricGuitarClean = 27,
    ElectricGuitarMuted = 28,
    OverdrivenGuitar = 29,
    DistortionGuitar = 30,
    GuitarHarmonics = 31,
    AcousticBass = 32,
    ElectricBassFinger = 33,
    ElectricBassPick = 34,
    FretlessBass = 35,
    SlapBass1 = 36,
    SlapBass2 = 37,
    SynthBass1 = 38,
    SynthBass2 = 39,
    Violin = 40,
    Viola = 41,
    Cello = 42,
    Contrabass = 43,
    TremoloStrings = 44,
    PizzicatoStrings = 45,
    OrchestralHarp = 46,
    Timpani = 47,
    StringEnsemble1 = 48,
    StringEnsemble2 = 49,
    SynthStrings1 = 50,
    SynthStrings2 = 51,
    ChoirAahs = 52,
    VoiceOohs = 53,
    SynthVoice = 54,
    OrchestraHit = 55,
    Trumpet = 56,
    Trombone = 57,
    Tuba = 58,
    MutedTrumpet = 59,
    FrenchHorn = 60,
    BrassSection = 61,
    SynthBrass1 = 62,
    SynthBrass2 = 63,
    SopranoSax = 64,
    AltoSax = 65,
    TenorSax = 66,
    BaritoneSax = 67,
    Oboe = 68,
    EnglishHorn = 69,
    Bassoon = 70,
    Clarinet = 71,
    Piccolo = 72,
    Flute = 73,
    Recorder = 74,
    PanFlute = 75,
    BlownBottle = 76,
    Shakuhachi = 77,
    Whistle = 78,
    Ocarina = 79,
    Lead1Square = 80,
    Lead2Sawtooth = 81,
    Lead3Calliope = 82,
    Lead4Chiff = 83,
    Lead5Charang = 84,
    Lead6Voice = 85,
    Lead7Fifths = 86,
    Lead8BassAndLead = 87,
    Pad1NewAge = 88,
    Pad2Warm = 89,
    Pad3Polysynth = 90,
    Pad4Choir = 91,
    Pad5Bowed = 92,
    Pad6Metallic = 93,
    Pad7Halo = 94,
    Pad8Sweep = 95,
    Fx1Rain = 96,
    Fx2Soundtrack = 97,
    Fx3Crystal = 98,
    Fx4Atmosphere = 99,
    Fx5Brightness = 100,
    Fx6Goblins = 101,
    Fx7Echoes = 102,
    Fx8SciFi = 103,
    Sitar = 104,
    Banjo = 105,
    Shamisen = 106,
    Koto = 107,
    Kalimba = 108,
    Bagpipe = 109,
    Fiddle = 110,
    Shanai = 111,
    TinkleBell = 112,
    Agogo = 113,
    SteelDrums = 114,
    Woodblock = 115,
    TaikoDrum = 116,
    MelodicTom = 117,
    SynthDrum = 118,
    ReverseCymbal = 119,
    GuitarFretNoise = 120,
    BreathNoise = 121,
    Seashore = 122,
    BirdTweet = 123,
    TelephoneRing = 124,
    Helicopter = 125,
    Applause = 126,
    Gunshot = 127,
}

impl Default for GeneralMidi {
    fn default() -> Self {
        GeneralMidi::AcousticGrandPiano
    }
}

impl GeneralMidi {
    pub(crate) fn from_u8(value: u8) -> LibResult<Self> {
        use GeneralMidi::*;
        const TABLE: [GeneralMidi; 128] = [
            AcousticGrandPiano,
            BrightAcousticPiano,
            ElectricGrandPiano,
            HonkyTonkPiano,
            ElectricPiano1,
            ElectricPiano2,
            Harpsichord,
            Clavi,
            Celesta,
            Glockenspiel,
            MusicBox,
            Vibraphone,
            Marimba,
            Xylophone,
            TubularBells,
            Dulcimer,
            DrawbarOrgan,
            PercussiveOrgan,
            RockOrgan,
            ChurchOrgan,
            ReedOrgan,
            Accordion,
            Harmonica,
            TangoAccordion,
            AcousticGuitarNylon,
            AcousticGuitarSteel,
            ElectricGuitarJazz,
            ElectricGuitarClean,
            ElectricGuitarMuted,
            OverdrivenGuitar,
            DistortionGuitar,
            GuitarHarmonics,
            AcousticBass,
            ElectricBassFinger,
            ElectricBassPick,
            FretlessBass,
            SlapBass1,
            SlapBass2,
            SynthBass1,
            SynthBass2,
            Violin,
            Viola,
            Cello,
            Contrabass,
            TremoloStrings,
            PizzicatoStrings,
            OrchestralHarp,
            Timpani,
            StringEnsemble1,
            StringEnsemble2,
            SynthStrings1,
            SynthStrings2,
            ChoirAahs,
            VoiceOohs,
            SynthVoice,
            OrchestraHit,
            Trumpet,
            Trombone,
            Tuba,
            MutedTrumpet,
            FrenchHorn,
            BrassSection,
            SynthBrass1,
            SynthBrass2,
            SopranoSax,
            AltoSax,
            TenorSax,
            BaritoneSax,
            Oboe,
            EnglishHorn,
            Bassoon,
            Clarinet,
            Piccolo,
            Flute,
            Recorder,
            PanFlute,
            BlownBottle,
            Shakuhachi,
            Whistle,
            Ocarina,
            Lead1Square,
            Lead2Sawtooth,
            Lead3Calliope,
            Lead4Chiff,
            Lead5Charang,
            Lead6Voice,
            Lead7Fifths,
            Lead8BassAndLead,
            Pad1NewAge,
            Pad2Warm,
            Pad3Polysynth,
            Pad4Choir,
            Pad5Bowed,
            Pad6Metallic,
            Pad7Halo,
            Pad8Sweep,
            Fx1Rain,
            Fx2Soundtrack,
            Fx3Crystal,
            Fx4Atmosphere,
            Fx5Brightness,
            Fx6Goblins,
            Fx7Echoes,
            Fx8SciFi,
            Sitar,
            Banjo,
            Shamisen,
            Koto,
            Kalimba,
            Bagpipe,
            Fiddle,
            Shanai,
            TinkleBell,
            Agogo,
            SteelDrums,
            Woodblock,
            TaikoDrum,
            MelodicTom,
            SynthDrum,
            ReverseCymbal,
            GuitarFretNoise,
            BreathNoise,
            Seashore,
            BirdTweet,
            TelephoneRing,
            Helicopter,
            Applause,
            Gunshot,
        ];
        match TABLE.get(value as usize) {
            Some(gm) => Ok(*gm),
            None => invalid_file_r!("unrecognized general midi program number {}", value),
        }
    }
}

impl TryFrom<u8> for GeneralMidi {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(Self::from_u8(value)?)
    }
}

impl From<GeneralMidi> for u8 {
    fn from(value: GeneralMidi) -> Self {
        value as u8
    }
}

#[test]
fn round_trips_every_program_number() {
    for n in 0..=127u8 {
        let gm = GeneralMidi::from_u8(n).unwrap();
        assert_eq!(n, u8::from(gm));
    }
}

#[test]
fn rejects_out_of_range() {
    assert!(GeneralMidi::from_u8(128).is_err());
}
