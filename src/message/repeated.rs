//! Repeated field dua fase: chain saat decode, array setelahnya.
//!
//! Item repeated bisa terselip di mana saja di dalam stream (packed run,
//! occurrence tunggal, campuran), jadi jumlah totalnya tidak diketahui
//! di muka. Selama decode, item ditampung sebagai linked list dari node
//! arena; setelah loop decode message pemilik selesai, `finalize`
//! memindahkan semua value ke satu slice contiguous. Dua alokasi arena
//! per item lebih murah daripada pre-pass menghitung jumlah.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::core::Arena;
use crate::error::Error;

/// Node chain sementara, hidup di arena.
pub(crate) struct Node<T> {
    value: T,
    next: Option<NonNull<Node<T>>>,
}

impl<T> Node<T> {
    #[inline(always)]
    pub(crate) fn new(value: T) -> Self {
        Self { value, next: None }
    }
}

/// Koleksi repeated field.
///
/// Sebelum `finalize` (dipanggil decoder lewat `finalize_repeated`)
/// item hanya tercatat di chain: `len()` sudah benar tapi slice view
/// masih kosong. Setelahnya koleksi berperilaku seperti `&mut [T]`
/// lewat `Deref`/`DerefMut`.
///
/// Di sisi encode, `alloc` menyiapkan slice berisi `T::default()` yang
/// caller isi lalu serahkan ke writer repeated milik `Encoder`.
///
/// `NonNull` di dalam chain membuat tipe ini sengaja `!Send`/`!Sync`:
/// seluruh model memori crate ini single-threaded per arena.
pub struct Repeated<'a, T> {
    items: &'a mut [T],
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _arena: PhantomData<&'a Arena<'a>>,
}

impl<'a, T> Repeated<'a, T> {
    /// Jumlah item yang diketahui, termasuk yang masih di chain.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View slice. Kosong sampai `finalize` (atau `alloc`) dijalankan.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.items
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.items
    }

    /// Siapkan `len` slot berisi `T::default()` untuk encode.
    /// Mengganti isi sebelumnya.
    pub fn alloc(&mut self, arena: &'a Arena<'a>, len: usize) -> Result<(), Error>
    where
        T: Default,
    {
        self.items = arena.alloc_default_slice(len)?;
        self.head = None;
        self.tail = None;
        self.len = len;
        Ok(())
    }

    /// Sambungkan satu node hasil decode ke ekor chain.
    pub(crate) fn push_node(&mut self, node: &'a mut Node<T>) {
        let ptr = NonNull::from(node);

        match self.tail {
            // SAFETY: tail menunjuk node arena yang hanya kita pegang;
            // tidak ada alias selain lewat chain ini.
            Some(mut tail) => unsafe { tail.as_mut().next = Some(ptr) },
            None => self.head = Some(ptr),
        }

        self.tail = Some(ptr);
        self.len += 1;
    }

    /// Pindahkan value dari chain ke satu slice contiguous di arena.
    /// No-op kalau chain kosong (sudah final, atau memang tanpa item).
    ///
    /// Value di-move keluar dari node dengan `ptr::read`; node bekasnya
    /// tidak pernah disentuh lagi dan tidak pernah di-drop - disiplin
    /// arena: tidak ada destructor yang jalan untuk isi arena.
    pub(crate) fn finalize(&mut self, arena: &'a Arena<'a>) -> Result<(), Error> {
        if self.head.is_none() {
            return Ok(());
        }

        let slots = arena.alloc_uninit_slice::<T>(self.len)?;
        let mut cursor = self.head;
        let mut count = 0;

        while let Some(node) = cursor {
            if count == slots.len() {
                break;
            }

            // SAFETY: node valid (hidup di arena) dan value-nya di-move
            // keluar tepat satu kali; chain langsung dibuang setelahnya.
            unsafe {
                slots[count].write(std::ptr::read(&node.as_ref().value));
                cursor = node.as_ref().next;
            }
            count += 1;
        }

        debug_assert_eq!(count, self.len);

        self.head = None;
        self.tail = None;
        self.len = count;

        let filled = &mut slots[..count];
        // SAFETY: tepat `count` slot pertama baru saja diisi dari chain;
        // slice hasil dibatasi ke prefix itu.
        self.items = unsafe { &mut *(filled as *mut [std::mem::MaybeUninit<T>] as *mut [T]) };
        Ok(())
    }
}

impl<'a, T> Default for Repeated<'a, T> {
    #[inline(always)]
    fn default() -> Self {
        Self {
            items: &mut [],
            head: None,
            tail: None,
            len: 0,
            _arena: PhantomData,
        }
    }
}

impl<'a, T> Deref for Repeated<'a, T> {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.items
    }
}

impl<'a, T> DerefMut for Repeated<'a, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.items
    }
}

impl<'a, T: std::fmt::Debug> std::fmt::Debug for Repeated<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, T: PartialEq> PartialEq for Repeated<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let repeated: Repeated<i32> = Repeated::default();
        assert!(repeated.is_empty());
        assert_eq!(repeated.len(), 0);
        assert!(repeated.as_slice().is_empty());
    }

    #[test]
    fn test_chain_then_finalize() {
        let mut buf = [0u8; 256];
        let arena = Arena::new(&mut buf);
        let mut repeated: Repeated<i32> = Repeated::default();

        for v in [10, 20, 30] {
            let node = arena.alloc(Node::new(v)).unwrap();
            repeated.push_node(node);
        }

        // Chain phase: len benar, slice belum
        assert_eq!(repeated.len(), 3);
        assert!(repeated.as_slice().is_empty());

        repeated.finalize(&arena).unwrap();
        assert_eq!(repeated.as_slice(), &[10, 20, 30]);
        assert_eq!(repeated[1], 20);

        // Finalize kedua kali no-op
        repeated.finalize(&arena).unwrap();
        assert_eq!(repeated.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn test_finalize_out_of_memory() {
        let mut buf = [0u8; 16];
        let arena = Arena::new(&mut buf);
        let mut repeated: Repeated<u64> = Repeated::default();

        let node = arena.alloc(Node::new(1u64)).unwrap();
        repeated.push_node(node);
        // Sisa arena tidak cukup untuk slice hasil
        assert_eq!(repeated.finalize(&arena), Err(Error::OutOfMemory));
    }

    #[test]
    #[should_panic]
    fn test_finalize_rejects_mixed_alloc_and_chain() {
        let mut buf = [0u8; 256];
        let arena = Arena::new(&mut buf);
        let mut repeated: Repeated<i32> = Repeated::default();

        // Pre-sized lewat alloc lalu ditambah node chain: len tidak
        // sama dengan jumlah node, invariant finalize dilanggar
        repeated.alloc(&arena, 2).unwrap();
        let node = arena.alloc(Node::new(9)).unwrap();
        repeated.push_node(node);
        repeated.finalize(&arena).unwrap();
    }

    #[test]
    fn test_alloc_for_encode() {
        let mut buf = [0u8; 64];
        let arena = Arena::new(&mut buf);
        let mut repeated: Repeated<i32> = Repeated::default();

        repeated.alloc(&arena, 3).unwrap();
        assert_eq!(repeated.as_slice(), &[0, 0, 0]);
        repeated[0] = 7;
        repeated[2] = -1;
        assert_eq!(repeated.as_slice(), &[7, 0, -1]);
    }
}
