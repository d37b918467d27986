//! The draw context: an off-screen pixmap, a fontset and color schemes,
//! with the rect/text/map primitives the bar renderer is built from.
//! Rendering goes through Xft so fontconfig patterns like
//! `monospace:size=10` work.
use crate::{Result, TatamiError};
use std::ffi::CString;
use std::os::raw::{c_int, c_uint};
use x11_dl::xft;
use x11_dl::xlib;
use x11_dl::xrender::XGlyphInfo;

/// Index into the draw context's scheme table.
pub type SchemeId = usize;

struct Font {
    xfont: *mut xft::XftFont,
    ascent: c_int,
    height: u32,
}

pub struct ColorScheme {
    pub fg: xft::XftColor,
    pub bg: xft::XftColor,
    pub border: xft::XftColor,
}

pub struct Drw {
    xlib: xlib::Xlib,
    xft: xft::Xft,
    display: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    drawable: xlib::Pixmap,
    gc: xlib::GC,
    fonts: Vec<Font>,
    schemes: Vec<ColorScheme>,
    current_scheme: SchemeId,
    width: u32,
    height: u32,
}

impl Drw {
    /// Creates the context with a root-sized drawable. Fonts must be
    /// loaded with [`Drw::fontset_create`] before any text call.
    ///
    /// # Errors
    ///
    /// Errors when Xft cannot be loaded.
    // `XCreatePixmap`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XCreatePixmap.html
    // `XCreateGC`: https://tronche.com/gui/x/xlib/GC/XCreateGC.html
    pub fn new(
        display: *mut xlib::Display,
        screen: c_int,
        root: xlib::Window,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let xlib = xlib::Xlib::open().map_err(|_| TatamiError::DisplayNotFound)?;
        let xft = xft::Xft::open().map_err(|_| TatamiError::DisplayNotFound)?;
        let (drawable, gc) = unsafe {
            let depth = (xlib.XDefaultDepth)(display, screen) as c_uint;
            let drawable = (xlib.XCreatePixmap)(display, root, width, height, depth);
            let gc = (xlib.XCreateGC)(display, root, 0, std::ptr::null_mut());
            (xlib.XSetLineAttributes)(
                display,
                gc,
                1,
                xlib::LineSolid,
                xlib::CapButt,
                xlib::JoinMiter,
            );
            (drawable, gc)
        };
        Ok(Self {
            xlib,
            xft,
            display,
            screen,
            root,
            drawable,
            gc,
            fonts: Vec::new(),
            schemes: Vec::new(),
            current_scheme: 0,
            width,
            height,
        })
    }

    /// Replaces the drawable with one of the new size; called when the
    /// screen geometry changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        unsafe {
            if self.drawable != 0 {
                (self.xlib.XFreePixmap)(self.display, self.drawable);
            }
            let depth = (self.xlib.XDefaultDepth)(self.display, self.screen) as c_uint;
            self.drawable =
                (self.xlib.XCreatePixmap)(self.display, self.root, width, height, depth);
        }
    }

    /// Opens every font pattern that resolves; at least one must.
    ///
    /// # Errors
    ///
    /// Errors when none of the patterns produce a usable font.
    pub fn fontset_create(&mut self, patterns: &[String]) -> Result<()> {
        for pattern in patterns {
            let Ok(name) = CString::new(pattern.as_str()) else {
                continue;
            };
            let xfont =
                unsafe { (self.xft.XftFontOpenName)(self.display, self.screen, name.as_ptr()) };
            if xfont.is_null() {
                tracing::warn!("cannot load font {pattern:?}");
                continue;
            }
            let (ascent, descent) = unsafe { ((*xfont).ascent, (*xfont).descent) };
            self.fonts.push(Font {
                xfont,
                ascent,
                height: (ascent + descent) as u32,
            });
        }
        if self.fonts.is_empty() {
            return Err(TatamiError::NoFonts);
        }
        Ok(())
    }

    /// Height of the primary font; the bar derives its height from this.
    #[must_use]
    pub fn font_height(&self) -> u32 {
        self.fonts.first().map_or(0, |font| font.height)
    }

    /// Allocates a `[fg, bg, border]` color scheme and returns its id.
    ///
    /// # Errors
    ///
    /// Errors when a color name cannot be allocated.
    // `XftColorAllocName`: https://linux.die.net/man/3/xftcolorallocname
    pub fn scheme_create(&mut self, colors: [&str; 3]) -> Result<SchemeId> {
        let mut allocated = Vec::with_capacity(3);
        for name in colors {
            allocated.push(self.alloc_color(name)?);
        }
        let border = allocated.pop().expect("three colors were allocated");
        let bg = allocated.pop().expect("three colors were allocated");
        let fg = allocated.pop().expect("three colors were allocated");
        self.schemes.push(ColorScheme { fg, bg, border });
        Ok(self.schemes.len() - 1)
    }

    fn alloc_color(&mut self, name: &str) -> Result<xft::XftColor> {
        let c_name = CString::new(name)
            .map_err(|_| TatamiError::ColorAllocation(name.to_string()))?;
        let mut color: xft::XftColor = unsafe { std::mem::zeroed() };
        let status = unsafe {
            (self.xft.XftColorAllocName)(
                self.display,
                (self.xlib.XDefaultVisual)(self.display, self.screen),
                (self.xlib.XDefaultColormap)(self.display, self.screen),
                c_name.as_ptr(),
                &mut color,
            )
        };
        if status == 0 {
            return Err(TatamiError::ColorAllocation(name.to_string()));
        }
        Ok(color)
    }

    /// Border pixel value of a scheme, for `XSetWindowBorder`.
    #[must_use]
    pub fn border_pixel(&self, scheme: SchemeId) -> std::os::raw::c_ulong {
        self.schemes[scheme].border.pixel
    }

    pub fn set_scheme(&mut self, scheme: SchemeId) {
        self.current_scheme = scheme;
    }

    /// Width of the text in the primary font, without padding.
    // `XftTextExtentsUtf8`: https://linux.die.net/man/3/xfttextextentsutf8
    #[must_use]
    pub fn text_width(&self, text: &str) -> u32 {
        let Some(font) = self.fonts.first() else {
            return 0;
        };
        let mut extents: XGlyphInfo = unsafe { std::mem::zeroed() };
        unsafe {
            (self.xft.XftTextExtentsUtf8)(
                self.display,
                font.xfont,
                text.as_ptr(),
                text.len() as c_int,
                &mut extents,
            );
        }
        u32::from(extents.xOff as u16)
    }

    /// Draws `text` into the box at `(x, y, w, h)`, background filled with
    /// the scheme's bg, text vertically centered and truncated to fit.
    /// Returns the x coordinate just past the box.
    // `XftDrawStringUtf8`: https://linux.die.net/man/3/xftdrawstringutf8
    pub fn text(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        left_pad: u32,
        text: &str,
        invert: bool,
    ) -> i32 {
        let scheme = &self.schemes[self.current_scheme];
        let (fg, bg) = if invert {
            (&scheme.bg, &scheme.fg)
        } else {
            (&scheme.fg, &scheme.bg)
        };
        unsafe {
            (self.xlib.XSetForeground)(self.display, self.gc, bg.pixel);
            (self.xlib.XFillRectangle)(self.display, self.drawable, self.gc, x, y, w, h);
        }

        let Some(font) = self.fonts.first() else {
            return x + w as i32;
        };
        let available = w.saturating_sub(left_pad) as i32;
        let truncated = self.truncate_to_width(text, available);
        if !truncated.is_empty() {
            let ty = y + (h as i32 - font.height as i32) / 2 + font.ascent;
            unsafe {
                let draw = (self.xft.XftDrawCreate)(
                    self.display,
                    self.drawable,
                    (self.xlib.XDefaultVisual)(self.display, self.screen),
                    (self.xlib.XDefaultColormap)(self.display, self.screen),
                );
                (self.xft.XftDrawStringUtf8)(
                    draw,
                    fg,
                    font.xfont,
                    x + left_pad as i32,
                    ty,
                    truncated.as_ptr(),
                    truncated.len() as c_int,
                );
                (self.xft.XftDrawDestroy)(draw);
            }
        }
        x + w as i32
    }

    /// Draws a rectangle, filled or hollow, in the scheme's fg (bg when
    /// inverted).
    // `XFillRectangle`: https://tronche.com/gui/x/xlib/graphics/filling-areas/XFillRectangle.html
    pub fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, filled: bool, invert: bool) {
        let scheme = &self.schemes[self.current_scheme];
        let pixel = if invert { scheme.bg.pixel } else { scheme.fg.pixel };
        unsafe {
            (self.xlib.XSetForeground)(self.display, self.gc, pixel);
            if filled {
                (self.xlib.XFillRectangle)(self.display, self.drawable, self.gc, x, y, w, h);
            } else {
                (self.xlib.XDrawRectangle)(
                    self.display,
                    self.drawable,
                    self.gc,
                    x,
                    y,
                    w.saturating_sub(1),
                    h.saturating_sub(1),
                );
            }
        }
    }

    /// Copies the rendered area onto a window.
    // `XCopyArea`: https://tronche.com/gui/x/xlib/graphics/XCopyArea.html
    pub fn map(&self, window: xlib::Window, x: i32, y: i32, w: u32, h: u32) {
        unsafe {
            (self.xlib.XCopyArea)(
                self.display,
                self.drawable,
                window,
                self.gc,
                x,
                y,
                w,
                h,
                x,
                y,
            );
            (self.xlib.XSync)(self.display, xlib::False);
        }
    }

    /// Longest prefix of `text` that fits into `width` pixels, with an
    /// ellipsis when anything had to go.
    fn truncate_to_width(&self, text: &str, width: i32) -> String {
        if width <= 0 {
            return String::new();
        }
        if self.text_width(text) as i32 <= width {
            return text.to_string();
        }
        let mut truncated: String = text.to_string();
        while !truncated.is_empty() {
            truncated.pop();
            let candidate = format!("{truncated}...");
            if self.text_width(&candidate) as i32 <= width {
                return candidate;
            }
        }
        String::new()
    }
}

impl Drop for Drw {
    // `XFreePixmap`: https://tronche.com/gui/x/xlib/pixmap-and-cursor/XFreePixmap.html
    fn drop(&mut self) {
        unsafe {
            for font in &self.fonts {
                (self.xft.XftFontClose)(self.display, font.xfont);
            }
            for scheme in &mut self.schemes {
                let visual = (self.xlib.XDefaultVisual)(self.display, self.screen);
                let colormap = (self.xlib.XDefaultColormap)(self.display, self.screen);
                (self.xft.XftColorFree)(self.display, visual, colormap, &mut scheme.fg);
                (self.xft.XftColorFree)(self.display, visual, colormap, &mut scheme.bg);
                (self.xft.XftColorFree)(self.display, visual, colormap, &mut scheme.border);
            }
            (self.xlib.XFreePixmap)(self.display, self.drawable);
            (self.xlib.XFreeGC)(self.display, self.gc);
        }
    }
}
