//! ST7789 LCD driver wiring
//!
//! The panel sits on the shared SPI bus behind its own chip select, so the
//! display interface goes through a shared-bus `SpiDevice` instead of
//! owning the `Spim`.

use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Delay;

use daisy_face::framebuffer::{self, FrameBuffer};
use display_interface_spi::SPIInterfaceNoCS;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type LcdSpi<'a, SPI> = SpiDevice<'a, NoopRawMutex, Spim<'a, SPI>, Output<'a, P0_25>>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: mipidsi::Display<
        SPIInterfaceNoCS<LcdSpi<'a, SPI>, Output<'a, P0_18>>,
        ST7789,
        Output<'a, P0_26>,
    >,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Configure the panel on boot and blank it.
    pub fn init(
        spi: LcdSpi<'a, SPI>,
        dc_pin: Output<'a, P0_18>,
        rst_pin: Output<'a, P0_26>,
    ) -> Self {
        let lcd = Builder::st7789(SPIInterfaceNoCS::new(spi, dc_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .unwrap();

        let mut display = Self { lcd };
        display.clear(Rgb565::BLACK).unwrap();
        display
    }

    /// Clear the display
    pub fn clear(&mut self, color: Rgb565) -> Result<(), mipidsi::Error> {
        self.lcd.clear(color)
    }

    /// Push a composed watchface frame full-screen.
    pub fn draw_frame(&mut self, frame: &FrameBuffer) -> Result<(), mipidsi::Error> {
        self.lcd.fill_contiguous(&framebuffer::AREA, frame.pixels())
    }
}
