/*!

This is the long-form manual for `nota_voting` and `judgevote`.

## How the count works

### Pairwise comparisons

Every pair of candidates `(a, b)`, with `a` before `b` in the order of the ids, is compared
on every ballot:
* a candidate that is ranked beats a candidate that is not ranked,
* when both are ranked, the better (smaller) rank wins,
* equal ranks, or neither candidate ranked, count for nobody.

Each ballot weighs as many votes as its `count`. The winner of the pair is the candidate with
strictly more votes; the margin is the difference. When both candidates have the same number
of votes, the pair is given to `b`.

### None of the above

The roster contains exactly one candidate named `None of the above`. Every candidate that
loses its comparison against this option is removed: it cannot win, and it is deleted from
all the ballots before the final step. The removal is done once, on the first set of
pairwise results.

### Winners

If the remaining candidates (the option `None of the above` excluded) are not more numerous
than the number of positions, they are all elected. Otherwise a proportional method selects
the winners from the ballots. `judgevote` uses a single transferable vote count:
* the quota is `floor(votes / (positions + 1)) + 1`,
* in every round, the candidate with the most votes is elected if it reaches the quota and
  the part of its votes above the quota moves to the next preferences,
* otherwise the candidate with the fewest votes is eliminated,
* candidates tied on a ballot share the ballot equally.

## Input formats

### Ballot files

A JSON array of ballots:

```text
[
  {"count": 3, "ranking": [["a"], ["b", "c"]]},
  {"count": 1, "ranking": {"c": 1, "a": 2}}
]
```

The ranking is either a list of groups (the first group is the most preferred, candidates in
the same group are tied) or an object giving the rank of each candidate. `ballot` is accepted
in place of `ranking`.

### Survey exports

`judgevote convert` turns the responses of an online form into a ballot file. The form is
expected to have one column per candidate, holding values like `Rank 1`, `Rank 2`, etc:

|Timestamp| Email address | ... | Alice  | Bob    | Clara  |
|---------|---------------|-----|--------|--------|--------|
| ...     | x@example.org |     | Rank 2 | Rank 1 |        |

Each column is mapped to a candidate id with `--column <id>=<index>` (the first column has
index 0). A blank cell ranks the candidate last (`--unranked-rank`, by default the number of
candidate columns). Both CSV and Excel (`.xlsx`) files are accepted.

## Configuration

```text
{
  "candidates": {"a": "Alice", "b": "Bob", "c": "Clara", "n": "None of the above"},
  "positions": 2,
  "votefile": "ballots.json"
}
```

Optional fields:
- `contestName` (string): copied in the summary.
- `tiebreakMode` (`useCandidateOrder` or `random`): how the count breaks ties when
  eliminating a candidate. With `useCandidateOrder`, the candidate with the largest id is
  eliminated first.
- `randomSeed` (string): the seed for the `random` mode.
- `aggregateBallots` (bool, default `true`): merge identical ballots before counting.

The path of the ballot file is relative to the configuration file.

 */
