use gnss_nav::{
    ashtech::{Alb, AshtechDecoder, AshtechRecord},
    epoch::week_second,
    prelude::{Constellation, GpsLNavAlmanac, TimeScale, SV},
};
use rand::{Rng, SeedableRng};

fn random_alb<R: Rng>(rng: &mut R) -> Vec<u8> {
    let mut bytes = b"$PASHR,ALB,".to_vec();
    bytes.extend((0..Alb::encoding_size() - 11).map(|_| rng.gen::<u8>()));
    bytes
}

#[test]
fn byte_exact_round_trip() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x0a1b);
    for _ in 0..64 {
        let bytes = random_alb(&mut rng);
        let alb = Alb::decode(&bytes).unwrap();
        assert_eq!(alb.to_bytes().unwrap(), bytes);
    }
}

#[test]
fn random_stream() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut stream = Vec::new();
    let mut expected = Vec::new();
    for _ in 0..16 {
        // garbage that can not contain a preamble
        let gap = rng.gen_range(0..32);
        stream.extend((0..gap).map(|_| rng.gen_range(0x80..=0xff_u8)));
        expected.push(stream.len() as u64);
        stream.extend(random_alb(&mut rng));
    }

    let frames = AshtechDecoder::new(stream.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(frames.len(), 16);
    for (frame, offset) in frames.iter().zip(expected.iter()) {
        assert_eq!(frame.offset, *offset);
        assert_eq!(frame.record.id(), "ALB");
    }
}

#[test]
fn almanac_subframe() {
    // subframe 5 page 3: TLM, HOW, then page data
    let mut words = [0_u32; 10];
    words[0] = 0x8B << 22;
    words[1] = (1000 << 13) | (5 << 8);
    words[2] = (1 << 28) | (3 << 22);
    let alb = Alb {
        svid: 3,
        words,
        ..Default::default()
    };

    let bytes = alb.to_bytes().unwrap();
    let mut decoder = AshtechDecoder::new(bytes.as_slice());
    let frame = decoder.next().unwrap().unwrap();
    let alb = match frame.record {
        AshtechRecord::Alb(alb) => alb,
        other => panic!("unexpected record {:?}", other),
    };
    assert_eq!(alb.sv().unwrap(), SV::new(Constellation::GPS, 3));

    let msg = alb.to_subframe(week_second(2100, 6000.0, TimeScale::GPST)).unwrap();
    let almanac = GpsLNavAlmanac::decode(&msg).unwrap();
    assert_eq!(almanac.subject, SV::new(Constellation::GPS, 3));
}
