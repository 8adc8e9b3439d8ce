// smps2bin - An SMPS2ASM music script assembler for Mega Drive sound drivers
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Negative tests: sources the assembler must reject, and with which code.

use smps2bin::{assemble, lexer, AssemblerOptions, DriverVersion, ErrorCode};
use test_case::test_case;

fn error_code(source: &str, target: u32) -> ErrorCode {
    let options = AssemblerOptions::new(DriverVersion::new(target).unwrap());
    let result = assemble(source, &options);
    assert!(result.is_err(), "Expected an error for {:?}", source);
    result.unwrap_err().first().unwrap().code
}

// ============================================================================
// Lexer Errors
// ============================================================================

#[test_case("\tdc.b 1 2\n", ErrorCode::ExpectedComma; "missing_comma")]
#[test_case("\tsmpsPan panLeft $00\n", ErrorCode::ExpectedComma; "missing_comma_after_symbol")]
#[test_case("\tdc.b 1, :2\n", ErrorCode::UnexpectedToken; "colon_in_arguments")]
#[test_case("Label: ,dc.b 1\n", ErrorCode::UnexpectedToken; "comma_as_mnemonic")]
fn test_lexer_errors(source: &str, expected: ErrorCode) {
    let err = lexer::tokenize(source).unwrap_err();
    assert_eq!(err.code, expected);
}

// ============================================================================
// Symbol Errors
// ============================================================================

#[test_case("Loop:\n\tsmpsStop\nLoop:\n"; "label_twice")]
#[test_case("nC4:\n\tsmpsStop\n"; "label_shadows_note")]
#[test_case("smpsPitch01hi:\n"; "label_shadows_pitch")]
fn test_duplicate_symbols(source: &str) {
    assert_eq!(error_code(source, 2), ErrorCode::DuplicateSymbol);
}

#[test]
fn test_undefined_symbol() {
    assert_eq!(error_code("\tsmpsCall Missing\n", 3), ErrorCode::UndefinedSymbol);
}

#[test]
fn test_dac_names_depend_on_driver() {
    // dKick only exists for the Sonic 1, Sonic 2 and Flamewing drivers.
    assert_eq!(error_code("\tdc.b dKick\n", 3), ErrorCode::UndefinedSymbol);
    let options = AssemblerOptions::new(DriverVersion::SONIC_2);
    assert!(assemble("\tdc.b dKick\n", &options).is_ok());
}

// ============================================================================
// Instruction Errors
// ============================================================================

#[test_case("\tsmpsDance\n"; "unknown")]
#[test_case("\tSMPSSTOP\n"; "wrong_case")]
#[test_case("\tdc.w 1\n"; "word_directive")]
fn test_unknown_instruction(source: &str) {
    assert_eq!(error_code(source, 2), ErrorCode::UnknownInstruction);
}

#[test_case("\tsmpsPan panLeft\n"; "pan")]
#[test_case("\tsmpsLoop $00, $02\n"; "loop")]
#[test_case("\tsmpsModSet 1, 2, 3\n"; "mod_set")]
#[test_case("\tsmpsVcDetune 1, 2, 3\n"; "voice_detune")]
fn test_missing_operand(source: &str) {
    assert_eq!(error_code(source, 2), ErrorCode::MissingOperand);
}

#[test_case("\tdc.b 256\n"; "just_over")]
#[test_case("\tdc.b $100\n"; "hex")]
#[test_case("\tdc.b -1\n"; "negative")]
#[test_case("\tdc.b 1, 2, $FFFF\n"; "last_of_many")]
fn test_byte_overflow(source: &str) {
    assert_eq!(error_code(source, 1), ErrorCode::ByteOverflow);
}

// ============================================================================
// Driver Support
// ============================================================================

#[test_case("\tsmpsSSGEG $00, $00, $00, $00\n", 1; "ssg_eg_s1")]
#[test_case("\tsmpsSSGEG $00, $00, $00, $00\n", 2; "ssg_eg_s2")]
#[test_case("\tsmpsClearPush\n", 2; "clear_push_s2")]
#[test_case("\tsmpsClearPush\n", 3; "clear_push_s3")]
#[test_case("\tsmpsSetVol $01\n", 1; "set_vol_s1")]
#[test_case("\tsmpsPitchSlide $01\n", 3; "pitch_slide_s3")]
#[test_case("\tsmpsSetLFO $01, $02\n", 4; "set_lfo_s3d")]
#[test_case("\tsmpsChanTempoDiv $01\n", 3; "chan_tempo_div_s3")]
#[test_case("\tsmpsHeaderStartSong 3\n\tsmpsHeaderVoiceUVB\n", 2; "uvb_s2")]
#[test_case("\tsmpsHeaderStartSong 3\n\tsmpsHeaderVoiceUVB\n", 5; "uvb_flamedriver")]
fn test_unsupported_in_driver(source: &str, target: u32) {
    assert_eq!(error_code(source, target), ErrorCode::UnsupportedInDriver);
}

#[test_case("\tsmpsHeaderStartSong 3\n\tsmpsHeaderSFXChannel cNoise, 0, 0, 0\n", 3; "noise_on_s3")]
#[test_case("\tsmpsHeaderStartSong 3\n\tsmpsHeaderSFXChannel cFM6, 0, 0, 0\n", 2; "fm6_on_s2")]
fn test_unsupported_channel(source: &str, target: u32) {
    assert_eq!(error_code(source, target), ErrorCode::UnsupportedChannel);
}

// ============================================================================
// Song Header Errors
// ============================================================================

#[test_case("\tsmpsSetTempoMod $01\n"; "tempo_mod")]
#[test_case("\tsmpsModSet 1, 2, 3, 4\n"; "mod_set")]
#[test_case("\tsmpsHeaderVoiceNull\n"; "voice_pointer")]
#[test_case("\tsmpsVcAmpMod 0, 0, 0, 0\n"; "amp_mod")]
#[test_case("\tsmpsNoteFill $01\n"; "note_fill")]
fn test_missing_song_header(source: &str) {
    assert_eq!(error_code(source, 3), ErrorCode::MissingSongHeader);
}

#[test_case("\tsmpsHeaderStartSong 0\n", ErrorCode::InvalidDriver; "driver_zero")]
#[test_case("\tsmpsHeaderStartSong 6\n", ErrorCode::InvalidDriver; "driver_six")]
#[test_case("\tsmpsHeaderStartSong 3, 2\n", ErrorCode::UnsupportedFormatVersion; "format_two")]
#[test_case("\tsmpsHeaderStartSong Src\nSrc:\n", ErrorCode::HeaderNotEvaluable; "forward_source")]
fn test_start_song_errors(source: &str, expected: ErrorCode) {
    assert_eq!(error_code(source, 3), expected);
}

#[test]
fn test_voice_setter_with_undefined_label() {
    let source = "\tsmpsHeaderStartSong 3\n\tsmpsVcAlgorithm Alg\n\tsmpsVcTotalLevel 0, 0, 0, 0\n";
    assert_eq!(error_code(source, 3), ErrorCode::UndefinedSymbol);
}

// ============================================================================
// Error Messages
// ============================================================================

#[test]
fn test_unsupported_message_names_driver() {
    let options = AssemblerOptions::new(DriverVersion::SONIC_1);
    let errors = assemble("\tsmpsSSGEG 0, 0, 0, 0\n", &options).unwrap_err();
    let error = errors.first().unwrap();
    assert!(error.message.contains("smpsSSGEG"));
    assert!(error.message.contains("Sonic 1"));
    assert_eq!(error.code_str(), "E203");
}

#[test]
fn test_byte_overflow_span_covers_instruction() {
    let options = AssemblerOptions::new(DriverVersion::SONIC_1);
    let errors = assemble("\tdc.b 1, 256\n", &options).unwrap_err();
    let span = errors.first().unwrap().span;
    assert_eq!((span.start, span.end), (1, 12));
}
