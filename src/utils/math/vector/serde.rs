use num::Num;
use serde::{Serialize, Serializer, Deserialize, Deserializer};
use serde::de::Error as DeError;
use serde::ser::SerializeStruct;

use super::ZeroSpVec;

impl<N> Serialize for ZeroSpVec<N>
where
    N: Num + Serialize + Copy,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        // fields: len, entries
        let mut state = serializer.serialize_struct("ZeroSpVec", 2)?;
        state.serialize_field("len", &(self.len() as u64))?;
        // entries: ordered (index, value) pairs
        let entries: Vec<(u64, N)> = self.raw_iter()
            .map(|(idx, val)| (idx as u64, *val))
            .collect();
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

impl<'de, N> Deserialize<'de> for ZeroSpVec<N>
where
    N: Num + Deserialize<'de> + Copy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        #[derive(Deserialize)]
        struct ZeroSpVecData<N> {
            len: usize,
            entries: Vec<(u64, N)>,
        }

        let data = ZeroSpVecData::deserialize(deserializer)?;

        let mut vec = ZeroSpVec::with_capacity(data.entries.len());
        vec.len = data.len;
        let mut prev: Option<usize> = None;
        for (index, value) in data.entries {
            let index = index as usize;
            if index >= data.len {
                return Err(DeError::custom(format!("ZeroSpVec entry {index} out of bounds for length {}", data.len)));
            }
            if prev.is_some_and(|p| p >= index) {
                return Err(DeError::custom("ZeroSpVec entries must be strictly ascending"));
            }
            prev = Some(index);
            vec.raw_push(index, value);
        }
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_json_keeps_len_and_entries() {
        let vec = ZeroSpVec::from_entries(4, vec![(2, 0.5_f64), (0, 1.0)]);
        let s = serde_json::to_string(&vec).unwrap();
        assert_eq!(s, r#"{"len":4,"entries":[[0,1.0],[2,0.5]]}"#);
        let de: ZeroSpVec<f64> = serde_json::from_str(&s).unwrap();
        assert_eq!(de, vec);
    }

    #[test]
    fn serde_rejects_unsorted_or_out_of_range() {
        assert!(serde_json::from_str::<ZeroSpVec<f64>>(r#"{"len":4,"entries":[[2,1.0],[1,1.0]]}"#).is_err());
        assert!(serde_json::from_str::<ZeroSpVec<f64>>(r#"{"len":2,"entries":[[2,1.0]]}"#).is_err());
    }
}
