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

//! The mnemonic table.

use std::collections::HashMap;

/// Every instruction the assembler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Raw data
    DcB,

    // Song and SFX headers
    HeaderStartSong,
    HeaderVoice,
    HeaderVoiceNull,
    HeaderVoiceUvb,
    HeaderChan,
    HeaderTempo,
    HeaderDac,
    HeaderFm,
    HeaderPsg,
    HeaderTempoSfx,
    HeaderChanSfx,
    HeaderSfxChannel,

    // Coordination flags
    Pan,
    Detune,
    Nop,
    Return,
    Fade,
    ChanTempoDiv,
    AlterVol,
    NoteFill,
    ChangeTransposition,
    SetTempoMod,
    SetTempoDiv,
    SetVol,
    PsgAlterVol,
    ClearPush,
    StopSpecial,
    FmVoice,
    ModSet,
    ModOn,
    Stop,
    PsgForm,
    ModOff,
    PsgVoice,
    Jump,
    Loop,
    Call,
    FmAlterVol,
    StopFm,
    SpindashRev,
    PlayDacSample,
    ConditionalJump,
    SetNote,
    FmiCommand,
    ModChange2,
    ModChange,
    ContinuousLoop,
    AlternateSmps,
    Fm3SpecialMode,
    PlaySound,
    HaltMusic,
    CopyData,
    SsgEg,
    FmVolEnv,
    ResetSpindashRev,
    ChanFmCommand,
    PitchSlide,
    SetLfo,
    PlayMusic,
    MaxRelRate,

    // FM voice definition
    VcFeedback,
    VcAlgorithm,
    VcUnusedBits,
    VcDetune,
    VcCoarseFreq,
    VcRateScale,
    VcAttackRate,
    VcAmpMod,
    VcDecayRate1,
    VcDecayRate2,
    VcDecayLevel,
    VcReleaseRate,
    VcTotalLevel,
}

impl Opcode {
    /// Voice setters only update the accumulator and emit nothing.
    pub fn is_voice_setter(self) -> bool {
        matches!(
            self,
            Opcode::VcFeedback
                | Opcode::VcAlgorithm
                | Opcode::VcUnusedBits
                | Opcode::VcDetune
                | Opcode::VcCoarseFreq
                | Opcode::VcRateScale
                | Opcode::VcAttackRate
                | Opcode::VcAmpMod
                | Opcode::VcDecayRate1
                | Opcode::VcDecayRate2
                | Opcode::VcDecayLevel
                | Opcode::VcReleaseRate
        )
    }
}

/// A table row: mnemonic, opcode and the minimum number of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub opcode: Opcode,
    pub min_operands: usize,
}

const MNEMONICS: &[(&str, Opcode, usize)] = &[
    ("dc.b", Opcode::DcB, 0),
    ("smpsHeaderStartSong", Opcode::HeaderStartSong, 1),
    ("smpsHeaderVoice", Opcode::HeaderVoice, 1),
    ("smpsHeaderVoiceNull", Opcode::HeaderVoiceNull, 0),
    ("smpsHeaderVoiceUVB", Opcode::HeaderVoiceUvb, 0),
    ("smpsHeaderChan", Opcode::HeaderChan, 2),
    ("smpsHeaderTempo", Opcode::HeaderTempo, 2),
    ("smpsHeaderDAC", Opcode::HeaderDac, 1),
    ("smpsHeaderFM", Opcode::HeaderFm, 3),
    ("smpsHeaderPSG", Opcode::HeaderPsg, 5),
    ("smpsHeaderTempoSFX", Opcode::HeaderTempoSfx, 1),
    ("smpsHeaderChanSFX", Opcode::HeaderChanSfx, 1),
    ("smpsHeaderSFXChannel", Opcode::HeaderSfxChannel, 4),
    ("smpsPan", Opcode::Pan, 2),
    ("smpsDetune", Opcode::Detune, 1),
    ("smpsAlterNote", Opcode::Detune, 1),
    ("smpsNop", Opcode::Nop, 1),
    ("smpsReturn", Opcode::Return, 0),
    ("smpsFade", Opcode::Fade, 0),
    ("smpsChanTempoDiv", Opcode::ChanTempoDiv, 1),
    ("smpsAlterVol", Opcode::AlterVol, 1),
    ("smpsNoteFill", Opcode::NoteFill, 1),
    ("smpsChangeTransposition", Opcode::ChangeTransposition, 1),
    ("smpsAlterPitch", Opcode::ChangeTransposition, 1),
    ("smpsSetTempoMod", Opcode::SetTempoMod, 1),
    ("smpsSetTempoDiv", Opcode::SetTempoDiv, 1),
    ("smpsSetVol", Opcode::SetVol, 1),
    ("smpsPSGAlterVol", Opcode::PsgAlterVol, 1),
    ("smpsClearPush", Opcode::ClearPush, 0),
    ("smpsStopSpecial", Opcode::StopSpecial, 0),
    ("smpsFMvoice", Opcode::FmVoice, 1),
    ("smpsSetvoice", Opcode::FmVoice, 1),
    ("smpsModSet", Opcode::ModSet, 4),
    ("smpsModOn", Opcode::ModOn, 0),
    ("smpsStop", Opcode::Stop, 0),
    ("smpsPSGform", Opcode::PsgForm, 1),
    ("smpsModOff", Opcode::ModOff, 0),
    ("smpsPSGvoice", Opcode::PsgVoice, 1),
    ("smpsJump", Opcode::Jump, 1),
    ("smpsLoop", Opcode::Loop, 3),
    ("smpsCall", Opcode::Call, 1),
    ("smpsFMAlterVol", Opcode::FmAlterVol, 1),
    ("smpsStopFM", Opcode::StopFm, 0),
    ("smpsSpindashRev", Opcode::SpindashRev, 0),
    ("smpsPlayDACSample", Opcode::PlayDacSample, 1),
    ("smpsConditionalJump", Opcode::ConditionalJump, 2),
    ("smpsSetNote", Opcode::SetNote, 1),
    ("smpsFMICommand", Opcode::FmiCommand, 2),
    ("smpsModChange2", Opcode::ModChange2, 2),
    ("smpsModChange", Opcode::ModChange, 1),
    ("smpsContinuousLoop", Opcode::ContinuousLoop, 1),
    ("smpsAlternateSMPS", Opcode::AlternateSmps, 1),
    ("smpsFM3SpecialMode", Opcode::Fm3SpecialMode, 4),
    ("smpsPlaySound", Opcode::PlaySound, 1),
    ("smpsHaltMusic", Opcode::HaltMusic, 1),
    ("smpsCopyData", Opcode::CopyData, 2),
    ("smpsSSGEG", Opcode::SsgEg, 4),
    ("smpsFMVolEnv", Opcode::FmVolEnv, 2),
    ("smpsFMFlutter", Opcode::FmVolEnv, 2),
    ("smpsResetSpindashRev", Opcode::ResetSpindashRev, 0),
    ("smpsChanFMCommand", Opcode::ChanFmCommand, 2),
    ("smpsPitchSlide", Opcode::PitchSlide, 1),
    ("smpsSetLFO", Opcode::SetLfo, 2),
    ("smpsPlayMusic", Opcode::PlayMusic, 1),
    ("smpsMaxRelRate", Opcode::MaxRelRate, 0),
    ("smpsWeirdD1LRR", Opcode::MaxRelRate, 0),
    ("smpsVcFeedback", Opcode::VcFeedback, 1),
    ("smpsVcAlgorithm", Opcode::VcAlgorithm, 1),
    ("smpsVcUnusedBits", Opcode::VcUnusedBits, 1),
    ("smpsVcDetune", Opcode::VcDetune, 4),
    ("smpsVcCoarseFreq", Opcode::VcCoarseFreq, 4),
    ("smpsVcRateScale", Opcode::VcRateScale, 4),
    ("smpsVcAttackRate", Opcode::VcAttackRate, 4),
    ("smpsVcAmpMod", Opcode::VcAmpMod, 4),
    ("smpsVcDecayRate1", Opcode::VcDecayRate1, 4),
    ("smpsVcDecayRate2", Opcode::VcDecayRate2, 4),
    ("smpsVcDecayLevel", Opcode::VcDecayLevel, 4),
    ("smpsVcReleaseRate", Opcode::VcReleaseRate, 4),
    ("smpsVcTotalLevel", Opcode::VcTotalLevel, 4),
];

/// Mnemonic lookup, case-sensitive.
#[derive(Debug, Clone)]
pub struct OpcodeTable {
    entries: Vec<OpcodeInfo>,
    index: HashMap<&'static str, usize>,
}

impl OpcodeTable {
    /// Build the table of all supported mnemonics.
    pub fn new() -> Self {
        let entries: Vec<OpcodeInfo> = MNEMONICS
            .iter()
            .map(|&(mnemonic, opcode, min_operands)| OpcodeInfo {
                mnemonic,
                opcode,
                min_operands,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, info)| (info.mnemonic, i))
            .collect();
        Self { entries, index }
    }

    pub fn lookup(&self, mnemonic: &str) -> Option<&OpcodeInfo> {
        self.index.get(mnemonic).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpcodeInfo> {
        self.entries.iter()
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}
