//! The SIF sidecar: one `source sign target` line per influence arc, using
//! export ids (SIF columns are whitespace-separated, so public names with
//! spaces would not survive).

use crate::export::sid_of;
use crate::{Influence, ReactionModel, Sign};
use std::io::{Error, Write};

/// Write the influence arcs in SIF format.
pub fn write_sif(
    out: &mut dyn Write,
    model: &ReactionModel,
    influences: &[Influence],
) -> Result<(), Error> {
    for arc in influences {
        let sign = match arc.sign {
            Sign::Positive => "+",
            Sign::Negative => "-",
        };
        writeln!(
            out,
            "{} {} {}",
            sid_of(model, arc.source),
            sign,
            sid_of(model, arc.target)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_sif;
    use crate::{Influence, ReactionModel, Sign, Species};

    #[test]
    fn one_line_per_arc() {
        let mut model = ReactionModel::new();
        let a = model.add_species(Species::new("sa1", "A")).unwrap();
        let b = model.add_species(Species::new("sa2", "B")).unwrap();
        let influences = vec![
            Influence { source: a, target: b, sign: Sign::Positive },
            Influence { source: b, target: a, sign: Sign::Negative },
        ];
        let mut buffer: Vec<u8> = Vec::new();
        write_sif(&mut buffer, &model, &influences).unwrap();
        assert_eq!("sa1 + sa2\nsa2 - sa1\n", String::from_utf8(buffer).unwrap());
    }
}
