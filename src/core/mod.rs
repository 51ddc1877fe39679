/*!
The `core` module is for types and concepts that are *not* strictly related to MIDI *files*.
These types and concepts could be used for realtime MIDI as well.
!*/

pub(crate) mod bits;
mod clocks;
mod duration_name;
mod general_midi;
mod message;
mod numbers;
mod status_type;

pub use clocks::Clocks;
pub use duration_name::DurationName;
pub use general_midi::GeneralMidi;
pub use message::{
    ChannelPressureMessage, Control, ControlChangeValue, Message, MonoModeOnValue, NoteMessage,
    PitchBendMessage, ProgramChangeValue,
};
pub use numbers::{
    Channel, ControlValue, NoteNumber, PitchBendValue, PortValue, Program, Velocity, U7,
};
pub(crate) use status_type::StatusType;
