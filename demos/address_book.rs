//! Address book demo - bentuk generated code yang diharapkan runtime.
//!
//! Run dengan: cargo run --example address_book
//!
//! Schema:
//! ```proto
//! message Person {
//!   message PhoneNumber { string number = 1; PhoneType type = 2; }
//!   enum PhoneType { MOBILE = 0; HOME = 1; WORK = 2; }
//!   string name = 1;
//!   int32 id = 2;
//!   string email = 3;
//!   repeated PhoneNumber phones = 4;
//! }
//! message AddressBook { repeated Person people = 1; }
//! ```

use caduceus::{Arena, Decoder, Encoder, Message, Repeated};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[repr(i32)]
enum PhoneType {
    #[default]
    Mobile = 0,
    Home = 1,
    Work = 2,
}

impl PhoneType {
    fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Home,
            2 => Self::Work,
            _ => Self::Mobile,
        }
    }
}

#[derive(Debug, Default)]
struct PhoneNumber<'a> {
    number: &'a str,
    phone_type: PhoneType,
}

impl<'a> Message<'a> for PhoneNumber<'a> {
    fn encode_inner(&self, encoder: &mut Encoder<'_>) {
        encoder.write_string(1, self.number);
        encoder.write_enum(2, self.phone_type as i32);
    }

    fn decode_inner(&mut self, decoder: &mut Decoder<'_, 'a>) {
        while decoder.available() {
            match decoder.read_tag() {
                (1, wire_type) => self.number = decoder.read_string(wire_type),
                (2, wire_type) => {
                    self.phone_type = PhoneType::from_i32(decoder.read_enum(wire_type))
                }
                (_, wire_type) => decoder.skip_field(wire_type),
            }
        }
    }
}

#[derive(Debug, Default)]
struct Person<'a> {
    name: &'a str,
    id: i32,
    email: &'a str,
    phones: Repeated<'a, PhoneNumber<'a>>,
}

impl<'a> Message<'a> for Person<'a> {
    fn encode_inner(&self, encoder: &mut Encoder<'_>) {
        encoder.write_string(1, self.name);
        encoder.write_int32(2, self.id);
        encoder.write_string(3, self.email);
        encoder.write_repeated_message(4, &self.phones);
    }

    fn decode_inner(&mut self, decoder: &mut Decoder<'_, 'a>) {
        while decoder.available() {
            match decoder.read_tag() {
                (1, wire_type) => self.name = decoder.read_string(wire_type),
                (2, wire_type) => self.id = decoder.read_int32(wire_type),
                (3, wire_type) => self.email = decoder.read_string(wire_type),
                (4, wire_type) => decoder.read_repeated_message(wire_type, &mut self.phones),
                (_, wire_type) => decoder.skip_field(wire_type),
            }
        }

        decoder.finalize_repeated(&mut self.phones);
    }
}

#[derive(Debug, Default)]
struct AddressBook<'a> {
    people: Repeated<'a, Person<'a>>,
}

impl<'a> Message<'a> for AddressBook<'a> {
    fn encode_inner(&self, encoder: &mut Encoder<'_>) {
        encoder.write_repeated_message(1, &self.people);
    }

    fn decode_inner(&mut self, decoder: &mut Decoder<'_, 'a>) {
        while decoder.available() {
            match decoder.read_tag() {
                (1, wire_type) => decoder.read_repeated_message(wire_type, &mut self.people),
                (_, wire_type) => decoder.skip_field(wire_type),
            }
        }

        decoder.finalize_repeated(&mut self.people);
    }
}

fn main() {
    println!("📒 Caduceus Address Book Demo");
    println!("=============================\n");

    // Semua memori dari dua buffer stack ini - tidak ada heap
    let mut encode_buf = [0u8; 256];
    let mut workspace = [0u8; 1024];

    // Encode
    let size = {
        let arena = Arena::new(&mut workspace);
        let mut book = AddressBook::default();
        book.people.alloc(&arena, 1).unwrap();

        let person = &mut book.people[0];
        person.name = "Kalle Kula";
        person.id = 56;
        person.email = "kalle.kula@foobar.com";
        person.phones.alloc(&arena, 2).unwrap();
        person.phones[0] = PhoneNumber {
            number: "+46701232345",
            phone_type: PhoneType::Home,
        };
        person.phones[1] = PhoneNumber {
            number: "+46999999999",
            phone_type: PhoneType::Work,
        };

        book.encode(&mut encode_buf).unwrap()
    };

    println!("📤 Encoded {} bytes:", size);
    for chunk in encode_buf[..size].chunks(16) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("   {}", hex.join(" "));
    }

    // Decode dari byte yang sama
    let arena = Arena::new(&mut workspace);
    let mut book = AddressBook::default();
    let consumed = book.decode(&encode_buf[..size], &arena).unwrap();

    println!("\n📥 Decoded {} bytes (arena used: {} bytes):", consumed, arena.used());
    for person in book.people.iter() {
        println!("   {} (id {}) <{}>", person.name, person.id, person.email);
        for phone in person.phones.iter() {
            println!("      {:?}: {}", phone.phone_type, phone.number);
        }
    }

    println!("\n✅ Done!");
}
