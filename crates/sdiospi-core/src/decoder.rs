//! Transaction decoder
//!
//! The decoder consumes the event stream of one SPI capture: chip-select
//! assert, byte pairs observed on the two data lines, chip-select deassert.
//! Bytes are buffered for one window only. At deassert the window is
//! decoded once (or discarded if it is too short to hold a command) and the
//! buffers are dropped.
//!
//! The only state carried between windows is the [`WindowState`] fed by
//! CMD52 writes to the address window registers. It belongs to one device
//! session, so each capture stream needs its own decoder.

use alloc::vec::Vec;

use crate::error::{DecodeError, Result};
use crate::frame::CommandFrame;
use crate::irq::name_irq_bits;
use crate::policy::ClassificationPolicy;
use crate::response::locate_response;
use crate::sdio::{
    Cmd52Fields, Cmd53Fields, CMD52, CMD53, INT1_CLR, INT1_STS, MIN_WINDOW_LEN,
};
use crate::transaction::{AddressDisplay, DecodedTransaction, TransactionKind, TransferMode};
use crate::window::{WindowRegister, WindowState};

/// Number of outbound bytes kept in an unrecognized transaction
pub const RAW_PREVIEW_LEN: usize = 10;

/// Bytes captured during one chip-select assertion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ByteWindow {
    /// Chip-select assert time
    pub start: f64,
    /// Host to device bytes
    pub mosi: Vec<u8>,
    /// Device to host bytes
    pub miso: Vec<u8>,
}

impl ByteWindow {
    /// Start an empty window at `start`
    pub fn new(start: f64) -> Self {
        Self {
            start,
            mosi: Vec::new(),
            miso: Vec::new(),
        }
    }

    /// Append one observation; either line may be absent
    pub fn push(&mut self, mosi: Option<u8>, miso: Option<u8>) {
        if let Some(b) = mosi {
            self.mosi.push(b);
        }
        if let Some(b) = miso {
            self.miso.push(b);
        }
    }

    /// Returns true if the window is long enough to hold a command
    pub fn is_decodable(&self) -> bool {
        self.mosi.len() >= MIN_WINDOW_LEN
    }
}

/// Where the decoder is in the window life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// No window has been opened yet
    #[default]
    Idle,
    /// Chip select asserted, bytes are being buffered
    Collecting,
    /// Last window was decoded into a transaction
    Decoded,
    /// Last window was too short and produced nothing
    Discarded,
}

/// Decoder for one SDIO-over-SPI capture stream
#[derive(Debug, Clone, Default)]
pub struct TransactionDecoder {
    policy: ClassificationPolicy,
    windows: WindowState,
    current: Option<ByteWindow>,
    state: DecoderState,
}

impl TransactionDecoder {
    /// Create a decoder using `policy` for bulk classification
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self {
            policy,
            windows: WindowState::new(),
            current: None,
            state: DecoderState::Idle,
        }
    }

    /// Classification policy in use
    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Address windows learned so far
    pub fn window_state(&self) -> &WindowState {
        &self.windows
    }

    /// Current life-cycle state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Chip select asserted at `timestamp`
    ///
    /// A window still open at this point never saw its deassert; it is
    /// dropped without decoding.
    pub fn assert(&mut self, timestamp: f64) {
        if let Some(open) = self.current.take() {
            log::warn!(
                "chip select asserted at {:.9} while window from {:.9} still open, dropping {} bytes",
                timestamp,
                open.start,
                open.mosi.len()
            );
        }
        self.current = Some(ByteWindow::new(timestamp));
        self.state = DecoderState::Collecting;
    }

    /// Bytes observed on the outbound and/or inbound line
    pub fn observe(&mut self, mosi: Option<u8>, miso: Option<u8>) {
        match self.current.as_mut() {
            Some(window) => window.push(mosi, miso),
            None => log::trace!("byte outside chip-select window ignored"),
        }
    }

    /// Chip select deasserted at `timestamp`
    ///
    /// Returns the decoded transaction, or `None` if no window was open or
    /// the window was too short to contain a command.
    pub fn deassert(&mut self, timestamp: f64) -> Option<DecodedTransaction> {
        let Some(window) = self.current.take() else {
            log::trace!("deassert at {:.9} without assert", timestamp);
            return None;
        };
        if !window.is_decodable() {
            log::trace!(
                "discarding {}-byte window at {:.9}",
                window.mosi.len(),
                window.start
            );
            self.state = DecoderState::Discarded;
            return None;
        }
        let txn = self.decode_window(&window, timestamp);
        self.state = DecoderState::Decoded;
        Some(txn)
    }

    /// Decode a complete window that ended at `end`
    pub fn decode_window(&mut self, window: &ByteWindow, end: f64) -> DecodedTransaction {
        let kind = self.classify(&window.mosi, &window.miso);
        log::trace!("{:.9}: {}", window.start, kind);
        DecodedTransaction {
            start: window.start,
            end,
            kind,
        }
    }

    /// Classify the bytes of one window
    pub fn classify(&mut self, mosi: &[u8], miso: &[u8]) -> TransactionKind {
        match self.try_classify(mosi, miso) {
            Ok(kind) => kind,
            Err(reason) => {
                log::debug!("unrecognized window: {}", reason);
                let len = mosi.len().min(RAW_PREVIEW_LEN);
                TransactionKind::Unrecognized {
                    reason,
                    raw: mosi[..len].to_vec(),
                    truncated: mosi.len() > RAW_PREVIEW_LEN,
                }
            }
        }
    }

    fn try_classify(&mut self, mosi: &[u8], miso: &[u8]) -> Result<TransactionKind> {
        let frame = CommandFrame::locate(mosi)?;
        match frame.command {
            CMD52 => Ok(self.decode_cmd52(&frame)),
            CMD53 => Ok(self.decode_cmd53(&frame, miso)),
            other => {
                log::debug!(
                    "unknown command 0x{:02X} (CMD{}) arg 0x{:08X}",
                    other,
                    frame.index(),
                    frame.argument
                );
                Ok(TransactionKind::Unrecognized {
                    reason: DecodeError::UnknownCommand(other),
                    raw: frame.raw_bytes().to_vec(),
                    truncated: false,
                })
            }
        }
    }

    fn decode_cmd52(&mut self, frame: &CommandFrame) -> TransactionKind {
        let fields = Cmd52Fields::from_argument(frame.argument);

        if fields.direction.is_write() {
            // Untracked functions still report the write, but nothing is stored
            let register = self
                .windows
                .record(fields.function, fields.address, fields.data)
                .or_else(|| WindowRegister::from_address(fields.address));
            if let Some(register) = register {
                return TransactionKind::WindowConfig {
                    function: fields.function,
                    register,
                    value: fields.data,
                };
            }
        }

        TransactionKind::RegisterAccess {
            function: fields.function,
            direction: fields.direction,
            raw: fields.raw,
            address: fields.address,
            data: fields.data,
        }
    }

    fn decode_cmd53(&self, frame: &CommandFrame, miso: &[u8]) -> TransactionKind {
        let fields = Cmd53Fields::from_argument(frame.argument);

        if fields.function == 0 {
            return TransactionKind::CardControl {
                direction: fields.direction,
                address: fields.address,
                count: fields.count,
            };
        }

        let address = self.address_display(fields.function, fields.address);

        match fields.address {
            INT1_STS => {
                let value = if fields.direction.is_write() {
                    None
                } else {
                    response_value(frame, miso)
                };
                TransactionKind::InterruptStatus {
                    function: fields.function,
                    direction: fields.direction,
                    address,
                    value,
                    flags: value.map(name_irq_bits),
                }
            }
            INT1_CLR => {
                // The device echoes the clear mask on the inbound line
                let value = response_value(frame, miso);
                TransactionKind::InterruptClear {
                    function: fields.function,
                    direction: fields.direction,
                    address,
                    value,
                    flags: value.map(name_irq_bits),
                }
            }
            _ => TransactionKind::DataAccess {
                bulk: self
                    .policy
                    .is_bulk(fields.function, fields.address, fields.count),
                function: fields.function,
                direction: fields.direction,
                address,
                count: fields.count,
                bytes: fields.byte_count(self.policy.block_size),
                mode: TransferMode::from(&fields),
            },
        }
    }

    fn address_display(&self, function: u8, link: u32) -> AddressDisplay {
        if !WindowState::is_tracked(function) {
            return AddressDisplay::Link(link);
        }
        match self.windows.resolve(function, link) {
            Some(full) => AddressDisplay::Resolved { full, link },
            None => AddressDisplay::WindowUnknown { link },
        }
    }
}

/// 32-bit register value from the response following `frame`
fn response_value(frame: &CommandFrame, miso: &[u8]) -> Option<u32> {
    let payload = locate_response(miso, frame.response_start())?;
    log::trace!(
        "payload at inbound offset {} ({})",
        payload.offset,
        if payload.token_found { "after token" } else { "no token" }
    );
    payload.value_le()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irq::{IrqBit, IrqSummary};
    use crate::sdio::Direction;
    use alloc::string::ToString;
    use alloc::vec;

    const A1_MOSI: [u8; 24] = [
        0xFF, 0x75, 0x14, 0xC0, 0xA0, 0x04, 0x89, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ];
    const A1_MISO: [u8; 24] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFE, 0x04, 0x00, 0x00,
        0x00, 0xCA, 0xF1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ];
    const A2_MOSI: [u8; 10] = [0xFF, 0x75, 0x94, 0xC0, 0xB0, 0x04, 0xCD, 0xFF, 0xFF, 0xFF];
    const A2_MISO: [u8; 22] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFE, 0x04, 0x00, 0x00,
        0x00, 0xCA, 0xF1, 0xFF, 0xE5, 0x0F, 0xFF,
    ];

    const FN1_WINDOW_0: [u8; 9] = [0xFF, 0x74, 0x92, 0x00, 0x00, 0x12, 0x9D, 0xFF, 0xFF];
    const FN1_WINDOW_1: [u8; 9] = [0xFF, 0x74, 0x92, 0x00, 0x02, 0x20, 0x4F, 0xFF, 0xFF];
    const FN1_CONFIG: [u8; 9] = [0xFF, 0x74, 0x92, 0x00, 0x04, 0x04, 0xE3, 0xFF, 0xFF];

    /// Feed one chip-select window through the event interface
    fn run(decoder: &mut TransactionDecoder, mosi: &[u8], miso: &[u8]) -> Option<TransactionKind> {
        decoder.assert(1.0);
        for i in 0..mosi.len().max(miso.len()) {
            decoder.observe(mosi.get(i).copied(), miso.get(i).copied());
        }
        decoder.deassert(2.0).map(|txn| txn.kind)
    }

    fn configure_fn1(decoder: &mut TransactionDecoder, lo: u8, hi: u8) {
        let mut w0 = FN1_WINDOW_0;
        w0[5] = lo;
        let mut w1 = FN1_WINDOW_1;
        w1[5] = hi;
        run(decoder, &w0, &[]);
        run(decoder, &w1, &[]);
        run(decoder, &FN1_CONFIG, &[]);
    }

    #[test]
    fn test_irq_status_read() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &A1_MOSI, &A1_MISO).unwrap();
        assert_eq!(
            kind,
            TransactionKind::InterruptStatus {
                function: 1,
                direction: Direction::Read,
                address: AddressDisplay::WindowUnknown { link: 0x6050 },
                value: Some(0x0000_0004),
                flags: Some(IrqSummary::Flags(vec![IrqBit::Pager(2)])),
            }
        );
        assert_eq!(decoder.state(), DecoderState::Decoded);
    }

    #[test]
    fn test_irq_status_without_response() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &A1_MOSI, &[0xFF; 24]).unwrap();
        match kind {
            TransactionKind::InterruptStatus { value, flags, .. } => {
                assert_eq!(value, None);
                assert_eq!(flags, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_irq_clear_echo() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &A2_MOSI, &A2_MISO).unwrap();
        assert_eq!(
            kind,
            TransactionKind::InterruptClear {
                function: 1,
                direction: Direction::Write,
                address: AddressDisplay::WindowUnknown { link: 0x6058 },
                value: Some(0x0000_0004),
                flags: Some(IrqSummary::Flags(vec![IrqBit::Pager(2)])),
            }
        );
    }

    #[test]
    fn test_irq_status_write_ignores_inbound() {
        // CMD53 write to INT1_STS with a well-formed response on the inbound line
        let mosi = [0xFF, 0x75, 0x94, 0xC0, 0xA0, 0x04, 0x00, 0xFF, 0xFF, 0xFF];
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &mosi, &A1_MISO).unwrap();
        assert_eq!(
            kind,
            TransactionKind::InterruptStatus {
                function: 1,
                direction: Direction::Write,
                address: AddressDisplay::WindowUnknown { link: 0x6050 },
                value: None,
                flags: None,
            }
        );
    }

    #[test]
    fn test_irq_clear_error_ack() {
        let mut miso = A2_MISO;
        miso[8] = 0x05;
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &A2_MOSI, &miso).unwrap();
        assert_eq!(
            kind,
            TransactionKind::InterruptClear {
                function: 1,
                direction: Direction::Write,
                address: AddressDisplay::WindowUnknown { link: 0x6058 },
                value: None,
                flags: None,
            }
        );
        assert_eq!(
            kind.summary(crate::policy::DecodeLevel::Basic).to_string(),
            "IRQ CLR: Registers/Control | 0x6058 (val:N/A) [N/A]"
        );
    }

    #[test]
    fn test_oversized_block_size_saturates() {
        let policy = ClassificationPolicy {
            block_size: 0x0100_0000,
            ..ClassificationPolicy::default()
        };
        let mut decoder = TransactionDecoder::new(policy);
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x2D, 0x35, 0x09, 0x42, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DataAccess {
                count: 0x142,
                bytes: u32::MAX,
                ..
            }
        ));

        // The decoder keeps working afterwards
        assert!(run(&mut decoder, &FN1_WINDOW_0, &[]).is_some());
        assert_eq!(decoder.state(), DecoderState::Decoded);
    }

    #[test]
    fn test_window_config_sequence() {
        let mut decoder = TransactionDecoder::default();

        let kind = run(&mut decoder, &FN1_WINDOW_0, &[]).unwrap();
        assert_eq!(
            kind,
            TransactionKind::WindowConfig {
                function: 1,
                register: WindowRegister::Window0,
                value: 0x12,
            }
        );
        assert!(!decoder.window_state().is_resolved(1));

        run(&mut decoder, &FN1_WINDOW_1, &[]);
        assert!(!decoder.window_state().is_resolved(1));

        let kind = run(&mut decoder, &FN1_CONFIG, &[]).unwrap();
        assert_eq!(
            kind,
            TransactionKind::WindowConfig {
                function: 1,
                register: WindowRegister::Config,
                value: 0x04,
            }
        );
        assert!(decoder.window_state().is_resolved(1));
        assert_eq!(decoder.window_state().resolve(1, 0x1234), Some(0x2012_1234));
        assert!(!decoder.window_state().is_resolved(2));
    }

    #[test]
    fn test_windowed_cmd53_read() {
        let mut decoder = TransactionDecoder::default();
        let read = [0xFF, 0x75, 0x14, 0x24, 0x68, 0x04, 0xC5, 0xFF, 0xFF, 0xFF];

        let kind = run(&mut decoder, &read, &[]).unwrap();
        match kind {
            TransactionKind::DataAccess { address, .. } => {
                assert_eq!(address, AddressDisplay::WindowUnknown { link: 0x1234 })
            }
            other => panic!("unexpected {:?}", other),
        }

        configure_fn1(&mut decoder, 0x12, 0x20);
        let kind = run(&mut decoder, &read, &[]).unwrap();
        assert_eq!(
            kind,
            TransactionKind::DataAccess {
                bulk: false,
                function: 1,
                direction: Direction::Read,
                address: AddressDisplay::Resolved {
                    full: 0x2012_1234,
                    link: 0x1234,
                },
                count: 4,
                bytes: 4,
                mode: TransferMode {
                    block: false,
                    increment: true,
                },
            }
        );
    }

    #[test]
    fn test_irq_status_resolved_address() {
        let mut decoder = TransactionDecoder::default();
        configure_fn1(&mut decoder, 0x00, 0x20);
        match run(&mut decoder, &A1_MOSI, &A1_MISO).unwrap() {
            TransactionKind::InterruptStatus { address, .. } => {
                assert_eq!(address.full(), Some(0x2000_6050));
                assert_eq!(address.link(), 0x6050);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_misencoded_window_fixture_is_register_access() {
        // Argument 0x90800012 puts the address in bit 23, i.e. 0x4000
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x74, 0x90, 0x80, 0x00, 0x12, 0x9D, 0xFF, 0xFF],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::RegisterAccess {
                function: 1,
                direction: Direction::Write,
                raw: false,
                address: 0x4000,
                data: 0x12,
            }
        );
        assert_eq!(decoder.window_state(), &WindowState::new());
    }

    #[test]
    fn test_window_config_untracked_function() {
        // Function 0 write to 0x10000: reported but not recorded
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x74, 0x82, 0x00, 0x00, 0x55, 0x00],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::WindowConfig {
                function: 0,
                register: WindowRegister::Window0,
                value: 0x55,
            }
        );
        assert_eq!(decoder.window_state(), &WindowState::new());
    }

    #[test]
    fn test_cmd52_read_of_window_register() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x74, 0x12, 0x00, 0x00, 0x00, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::RegisterAccess {
                function: 1,
                direction: Direction::Read,
                address: 0x10000,
                ..
            }
        ));
        assert_eq!(decoder.window_state(), &WindowState::new());
    }

    #[test]
    fn test_card_control() {
        let mut decoder = TransactionDecoder::default();
        configure_fn1(&mut decoder, 0x12, 0x20);
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x00, 0x00, 0x1E, 0x01, 0x00],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::CardControl {
                direction: Direction::Read,
                address: 0x0F,
                count: 1,
            }
        );
    }

    #[test]
    fn test_bulk_classification() {
        let mut decoder = TransactionDecoder::default();

        // Function 1 write of 64 bytes to DATA_BUF 0xC214
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x95, 0x84, 0x28, 0x40, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DataAccess {
                bulk: true,
                function: 1,
                count: 64,
                bytes: 64,
                ..
            }
        ));

        // Same buffer, 32 bytes: at the threshold, not bulk
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x95, 0x84, 0x28, 0x20, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DataAccess { bulk: false, .. }
        ));

        // Function 2 block read: always bulk, 3 blocks of 512
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x2D, 0x35, 0x08, 0x03, 0x00],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::DataAccess {
                bulk: true,
                function: 2,
                direction: Direction::Read,
                address: AddressDisplay::WindowUnknown { link: 0x9A84 },
                count: 3,
                bytes: 1536,
                mode: TransferMode {
                    block: true,
                    increment: true,
                },
            }
        );
    }

    #[test]
    fn test_policy_block_size() {
        let policy = ClassificationPolicy {
            block_size: 256,
            ..ClassificationPolicy::default()
        };
        let mut decoder = TransactionDecoder::new(policy);
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x2D, 0x35, 0x08, 0x03, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DataAccess { bytes: 768, .. }
        ));
    }

    #[test]
    fn test_unwindowed_function() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x75, 0x34, 0x02, 0x00, 0x08, 0x00],
            &[],
        )
        .unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DataAccess {
                function: 3,
                address: AddressDisplay::Link(0x100),
                ..
            }
        ));
    }

    #[test]
    fn test_short_windows_discarded() {
        let mut decoder = TransactionDecoder::default();
        for len in 0..MIN_WINDOW_LEN {
            assert_eq!(run(&mut decoder, &A1_MOSI[..len], &A1_MISO), None);
            assert_eq!(decoder.state(), DecoderState::Discarded);
        }
        assert!(run(&mut decoder, &A1_MOSI[..MIN_WINDOW_LEN], &[]).is_some());
    }

    #[test]
    fn test_unknown_command() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x40, 0x00, 0x00, 0x00, 0x00, 0x95, 0xFF],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::Unrecognized {
                reason: DecodeError::UnknownCommand(0x40),
                raw: vec![0x40, 0x00, 0x00, 0x00, 0x00],
                truncated: false,
            }
        );
    }

    #[test]
    fn test_command_byte_without_marker() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(
            &mut decoder,
            &[0xFF, 0x00, 0x14, 0xC0, 0xA0, 0x04, 0x89],
            &[],
        )
        .unwrap();
        assert_eq!(
            kind,
            TransactionKind::Unrecognized {
                reason: DecodeError::SyncFailed,
                raw: vec![0xFF, 0x00, 0x14, 0xC0, 0xA0, 0x04, 0x89],
                truncated: false,
            }
        );
    }

    #[test]
    fn test_sync_failure_truncates_raw() {
        let mut decoder = TransactionDecoder::default();
        let kind = run(&mut decoder, &[0x00; 12], &[]).unwrap();
        assert_eq!(
            kind,
            TransactionKind::Unrecognized {
                reason: DecodeError::SyncFailed,
                raw: vec![0x00; 10],
                truncated: true,
            }
        );

        let kind = run(&mut decoder, &[0x00; 10], &[]).unwrap();
        assert!(matches!(
            kind,
            TransactionKind::Unrecognized { truncated: false, .. }
        ));
    }

    #[test]
    fn test_failure_keeps_window_state() {
        let mut decoder = TransactionDecoder::default();
        configure_fn1(&mut decoder, 0x12, 0x20);
        let before = decoder.window_state().clone();

        run(&mut decoder, &[0x00; 12], &[]);
        run(&mut decoder, &[0xFF, 0x40, 0, 0, 0, 0, 0x95], &[]);
        run(&mut decoder, &[0xFF, 0x74], &[]);

        assert_eq!(decoder.window_state(), &before);
    }

    #[test]
    fn test_event_edge_cases() {
        let mut decoder = TransactionDecoder::default();
        assert_eq!(decoder.state(), DecoderState::Idle);

        // Bytes and deassert outside a window are ignored
        decoder.observe(Some(0xFF), None);
        assert_eq!(decoder.deassert(0.5), None);
        assert_eq!(decoder.state(), DecoderState::Idle);

        // A second assert drops the open window
        decoder.assert(1.0);
        for b in A1_MOSI {
            decoder.observe(Some(b), None);
        }
        decoder.assert(3.0);
        assert_eq!(decoder.state(), DecoderState::Collecting);
        for b in FN1_WINDOW_0 {
            decoder.observe(Some(b), None);
        }
        let txn = decoder.deassert(4.0).unwrap();
        assert_eq!(txn.start, 3.0);
        assert_eq!(txn.end, 4.0);
        assert!(matches!(txn.kind, TransactionKind::WindowConfig { .. }));
    }

    #[test]
    fn test_one_sided_observations() {
        let mut decoder = TransactionDecoder::default();
        decoder.assert(0.0);
        for b in A1_MOSI {
            decoder.observe(Some(b), None);
        }
        for b in A1_MISO {
            decoder.observe(None, Some(b));
        }
        let txn = decoder.deassert(1.0).unwrap();
        assert!(matches!(
            txn.kind,
            TransactionKind::InterruptStatus {
                value: Some(4),
                ..
            }
        ));
    }
}
