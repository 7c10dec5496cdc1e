//! SPI NOR flash resource storage
//!
//! The watchface assets are flashed into the external NOR at fixed offsets;
//! this module is the platform's resource loader, resolving a
//! [`ResourceId`] to a flash region and reading it out over the shared SPI
//! bus.

use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice as SharedSpiDevice;
use embassy_nrf::{
    gpio::Output,
    peripherals::P0_05,
    spim::{self, Spim},
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::spi::{Operation, SpiDevice};

use daisy_face::resources::{ResourceId, ResourceLoader, HAND_IMAGE_BYTES, HOUR_IMAGE_BYTES};

/// Base address of the hour image region.
const HOUR_REGION: u32 = 0x0030_0000;
/// Base address of the hand mask region, directly after the hour images.
const HAND_REGION: u32 = HOUR_REGION + 12 * HOUR_IMAGE_BYTES as u32;

// XT25F32B commands
const CMD_READ: u8 = 0x03;
const CMD_READ_ID: u8 = 0xab;
const CMD_POWER_DOWN: u8 = 0xb9;

/// SPIM EasyDMA on the nRF52832 moves at most 255 bytes per transfer
/// (`RXD.MAXCNT` is 8 bits wide); longer reads truncate silently.
const EASY_DMA_CHUNK: usize = 255;

/// Start addresses for reading `len` bytes from `addr` in DMA-sized pieces.
fn chunk_addrs(addr: u32, len: usize) -> impl Iterator<Item = u32> {
    (0..len)
        .step_by(EASY_DMA_CHUNK)
        .map(move |offset| addr + offset as u32)
}

/// Flash region of one packaged asset.
fn address_of(id: ResourceId) -> u32 {
    let hour_slot = |n: u32| HOUR_REGION + n * HOUR_IMAGE_BYTES as u32;
    match id {
        ResourceId::Hour1 => hour_slot(0),
        ResourceId::Hour2 => hour_slot(1),
        ResourceId::Hour3 => hour_slot(2),
        ResourceId::Hour4 => hour_slot(3),
        ResourceId::Hour5 => hour_slot(4),
        ResourceId::Hour6 => hour_slot(5),
        ResourceId::Hour7 => hour_slot(6),
        ResourceId::Hour8 => hour_slot(7),
        ResourceId::Hour9 => hour_slot(8),
        ResourceId::Hour10 => hour_slot(9),
        ResourceId::Hour11 => hour_slot(10),
        ResourceId::Hour12 => hour_slot(11),
        ResourceId::HandWhite => HAND_REGION,
        ResourceId::HandBlack => HAND_REGION + HAND_IMAGE_BYTES as u32,
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Bus,
}

type FlashSpi<'a, SPI> = SharedSpiDevice<'a, NoopRawMutex, Spim<'a, SPI>, Output<'a, P0_05>>;

pub struct FlashResources<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Flash SPI interface
    interface: FlashSpi<'a, SPI>,
}

impl<'a, SPI> FlashResources<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Configure flash settings on boot
    pub fn init(spi: FlashSpi<'a, SPI>) -> Self {
        Self { interface: spi }
    }

    /// Read device ID
    pub fn read_id(&mut self) -> u8 {
        let buf: &mut [u8] = &mut [CMD_READ_ID, 0x00, 0x00, 0x00];
        // Set CS low, shift instruction code `ABH` followed by 3 dummy bytes,
        // then set CS high again
        self.interface.transfer_in_place(buf).unwrap();
        buf[0]
    }

    /// Enable deep power down state
    #[allow(unused)]
    pub fn power_down(&mut self) {
        self.interface.write(&[CMD_POWER_DOWN]).unwrap();
    }

    /// Read `buf.len()` bytes starting at the 24-bit address `addr`.
    ///
    /// The assets are far larger than one EasyDMA transfer, so each DMA
    /// sized piece gets its own read command at the advanced address.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Error> {
        let len = buf.len();
        for (chunk, chunk_addr) in buf.chunks_mut(EASY_DMA_CHUNK).zip(chunk_addrs(addr, len)) {
            let cmd = [
                CMD_READ,
                (chunk_addr >> 16) as u8,
                (chunk_addr >> 8) as u8,
                chunk_addr as u8,
            ];
            self.interface
                .transaction(&mut [Operation::Write(&cmd), Operation::Read(chunk)])
                .map_err(|_| Error::Bus)?;
        }
        Ok(())
    }
}

impl<SPI> ResourceLoader for FlashResources<'_, SPI>
where
    SPI: spim::Instance,
{
    type Error = Error;

    fn load(&mut self, id: ResourceId, buf: &mut [u8]) -> Result<(), Error> {
        self.read(address_of(id), buf)
    }
}
