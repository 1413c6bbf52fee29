//! Bump allocator di atas fixed buffer milik caller.
//!
//! Tidak ada alokasi heap sama sekali: caller menyediakan `&mut [u8]`,
//! arena hanya menggeser satu offset maju. Tidak ada free; lifetime
//! seluruh isi arena sama dengan lifetime pinjaman buffer.

use std::alloc::Layout;
use std::cell::Cell;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::error::Error;

/// Bump arena di atas buffer tetap.
///
/// Alokasi mengembalikan referensi yang hidup selama pinjaman `&self`,
/// jadi sebuah message hasil decode tidak pernah outlive arena-nya -
/// dijamin compiler, bukan konvensi.
pub struct Arena<'b> {
    base: NonNull<u8>,
    size: usize,
    pos: Cell<usize>,
    _buf: PhantomData<&'b mut [u8]>,
}

impl<'b> Arena<'b> {
    /// Membuat arena di atas buffer milik caller.
    ///
    /// Bookkeeping hidup di value `Arena` sendiri (bukan di dalam buffer),
    /// jadi pembuatan tidak pernah gagal - buffer yang terlalu kecil baru
    /// terasa saat alokasi pertama mengembalikan `OutOfMemory`.
    #[inline(always)]
    pub fn new(buf: &'b mut [u8]) -> Self {
        let size = buf.len();
        // SAFETY: pointer dari slice tidak pernah null, termasuk slice kosong.
        let base = unsafe { NonNull::new_unchecked(buf.as_mut_ptr()) };

        Self {
            base,
            size,
            pos: Cell::new(0),
            _buf: PhantomData,
        }
    }

    /// Reserve `layout.size()` bytes dengan alignment `layout.align()`.
    ///
    /// Satu-satunya primitive alokasi; semua yang lain dibangun di atasnya.
    /// Offset hanya maju - gagal sekali berarti gagal selamanya untuk
    /// ukuran itu, caller harus retry dengan buffer lebih besar.
    fn alloc_raw(&self, layout: Layout) -> Result<NonNull<u8>, Error> {
        let pos = self.pos.get();
        // SAFETY: pos <= size selalu, jadi base + pos masih di dalam
        // (atau tepat di akhir) alokasi buffer caller.
        let cursor = unsafe { self.base.as_ptr().add(pos) };
        let padding = cursor.align_offset(layout.align());

        let start = match pos.checked_add(padding) {
            Some(start) => start,
            None => return Err(Error::OutOfMemory),
        };
        let end = match start.checked_add(layout.size()) {
            Some(end) => end,
            None => return Err(Error::OutOfMemory),
        };

        if end > self.size {
            return Err(Error::OutOfMemory);
        }

        self.pos.set(end);

        // SAFETY: start <= end <= size, jadi pointer hasil masih di dalam
        // buffer dan sudah aligned sesuai layout.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(start)) })
    }

    /// Alokasi satu value bertipe `T`.
    #[inline]
    pub fn alloc<T>(&self, value: T) -> Result<&mut T, Error> {
        let ptr = self.alloc_raw(Layout::new::<T>())?.cast::<T>();

        // SAFETY: ptr aligned dan exclusive (bump allocator tidak pernah
        // mengembalikan range yang sama dua kali), jadi write + reborrow
        // sebagai &mut aman.
        unsafe {
            ptr.as_ptr().write(value);
            Ok(&mut *ptr.as_ptr())
        }
    }

    /// Alokasi slice `len` item, semua diisi `T::default()`.
    pub fn alloc_default_slice<T: Default>(&self, len: usize) -> Result<&mut [T], Error> {
        let slice = self.alloc_uninit_slice::<T>(len)?;

        for slot in slice.iter_mut() {
            slot.write(T::default());
        }

        // SAFETY: semua slot baru saja diinisialisasi.
        Ok(unsafe { &mut *(slice as *mut [MaybeUninit<T>] as *mut [T]) })
    }

    /// Alokasi slice uninitialized. Caller wajib mengisi semua slot
    /// sebelum assume-init (dipakai `Repeated::finalize`).
    pub(crate) fn alloc_uninit_slice<T>(&self, len: usize) -> Result<&mut [MaybeUninit<T>], Error> {
        let layout = match Layout::array::<T>(len) {
            Ok(layout) => layout,
            Err(_) => return Err(Error::OutOfMemory),
        };
        let ptr = self.alloc_raw(layout)?.cast::<MaybeUninit<T>>();

        // SAFETY: range [ptr, ptr + len) baru di-reserve, aligned, dan
        // exclusive. MaybeUninit tidak butuh inisialisasi.
        Ok(unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) })
    }

    /// Copy byte slice ke dalam arena.
    #[inline]
    pub fn alloc_copy(&self, src: &[u8]) -> Result<&mut [u8], Error> {
        let layout = Layout::from_size_align(src.len(), 1).map_err(|_| Error::OutOfMemory)?;
        let ptr = self.alloc_raw(layout)?;

        // SAFETY: tujuan baru di-reserve (exclusive), sumber adalah slice
        // valid, dan keduanya tidak overlap (arena vs memori caller).
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), src.len()))
        }
    }

    /// Copy string ke dalam arena.
    #[inline]
    pub fn alloc_str(&self, src: &str) -> Result<&str, Error> {
        let bytes = self.alloc_copy(src.as_bytes())?;

        // SAFETY: bytes adalah copy bit-identik dari &str valid.
        Ok(unsafe { std::str::from_utf8_unchecked(bytes) })
    }

    /// Bytes yang sudah terpakai.
    #[inline(always)]
    pub fn used(&self) -> usize {
        self.pos.get()
    }

    /// Sisa kapasitas.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.size - self.pos.get()
    }

    /// Kapasitas total buffer.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.size
    }
}
