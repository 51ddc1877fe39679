// channel is 0-15, displayed to users as 1-16.
clamp!(Channel, u8, 0, 15, 0, pub);

clamp!(NoteNumber, u8, 0, 127, 60, pub);
clamp!(Velocity, u8, 0, 127, 72, pub);
clamp!(Program, u8, 0, 127, 0, pub);
clamp!(U7, u8, 0, 127, 0, pub);
clamp!(ControlValue, u8, 0, 127, 0, pub);
clamp!(PortValue, u8, 0, 15, 0, pub);

/// A 14-bit pitch bend value, as transmitted in a [`crate::core::Message::PitchBend`] message.
/// `8192` is the center (no bend) position; `0` is maximum downward bend and `16383` is maximum
/// upward bend.
clamp!(PitchBendValue, u16, 0, 16383, 8192, pub);
